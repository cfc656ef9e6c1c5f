//! The orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use stratus_action::adapters::Adapters;
use stratus_action::{HandlerContext, HandlerRegistry, NodeOutcome};
use stratus_core::{ExecutionId, NodeId, WorkflowId};
use stratus_eventbus::{Event, EventBus, EventName};
use stratus_execution::{
    ExecutionContext, ExecutionDocument, ExecutionStatus, StepOutcome, StepRecord,
    current_rss_bytes,
};
use stratus_expression::evaluate_condition;
use stratus_storage::{CacheStore, ExecutionStore, LockService};
use stratus_workflow::{NodeDefinition, NodeKind, Workflow, WorkflowStore};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// An execution held in memory while it is being worked on.
struct RunningEntry {
    /// Mutated only inside `execution:<id>` critical sections.
    context: Arc<Mutex<ExecutionContext>>,
    /// Definition snapshot taken at start (or at resume after a restart).
    workflow: Arc<Workflow>,
}

/// What the traversal does after one step.
enum StepFlow {
    /// Follow these targets (empty for a leaf; the traversal completes
    /// the execution once its whole stack drains).
    Next(Vec<NodeId>),
    /// The execution paused, failed, or disappeared; schedule nothing.
    Stop,
}

/// The workflow execution engine.
///
/// Owns the in-memory running map and composes the stores, cache, lock
/// service, event bus, handler registry and adapters it is constructed
/// with. There is no global instance; the server creates one engine at
/// startup and passes it by reference.
pub struct WorkflowEngine {
    workflows: Arc<dyn WorkflowStore>,
    executions: Arc<dyn ExecutionStore>,
    cache: Arc<dyn CacheStore>,
    bus: Arc<EventBus>,
    adapters: Arc<Adapters>,
    handlers: HandlerRegistry,
    locks: LockService,
    running: DashMap<ExecutionId, RunningEntry>,
    config: EngineConfig,
}

impl WorkflowEngine {
    /// Create an engine with the built-in handler registry.
    #[must_use]
    pub fn new(
        workflows: Arc<dyn WorkflowStore>,
        executions: Arc<dyn ExecutionStore>,
        cache: Arc<dyn CacheStore>,
        bus: Arc<EventBus>,
        adapters: Arc<Adapters>,
        config: EngineConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            workflows,
            executions,
            cache,
            bus,
            adapters,
            handlers: HandlerRegistry::builtin(),
            locks: LockService::new(config.lock_acquire_timeout()),
            running: DashMap::new(),
            config,
        })
    }

    /// The event bus this engine publishes on.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Whether an execution is currently held in memory.
    #[must_use]
    pub fn is_in_memory(&self, id: &ExecutionId) -> bool {
        self.running.contains_key(id)
    }

    // ── Public operations ──────────────────────────────────────────────

    /// Start a new execution of a workflow.
    ///
    /// Validates the workflow (present, active, has a trigger node),
    /// builds and persists the context, then schedules traversal and
    /// returns the fresh execution id.
    pub async fn start_workflow(
        self: &Arc<Self>,
        workflow_id: WorkflowId,
        trigger_data: Option<Map<String, Value>>,
    ) -> Result<ExecutionId, EngineError> {
        let workflow = self
            .workflows
            .find_by_id(&workflow_id)
            .await?
            .ok_or_else(|| EngineError::WorkflowNotFound(workflow_id.clone()))?;
        if !workflow.is_active() {
            return Err(EngineError::WorkflowNotActive(workflow_id));
        }
        let start_node = workflow
            .start_node()
            .ok_or_else(|| EngineError::NoTriggerNode(workflow_id.clone()))?
            .id
            .clone();

        let mut context = ExecutionContext::new(
            ExecutionId::generate(),
            workflow_id,
            trigger_data.unwrap_or_default(),
        );
        context.set_current(start_node.clone());
        let execution_id = context.execution_id.clone();

        self.persist_context(&context).await?;
        self.running.insert(
            execution_id.clone(),
            RunningEntry {
                context: Arc::new(Mutex::new(context)),
                workflow,
            },
        );
        info!(execution_id = %execution_id, "workflow execution started");

        let engine = Arc::clone(self);
        let id = execution_id.clone();
        tokio::spawn(async move {
            engine.run_traversal(id, vec![start_node]).await;
        });

        Ok(execution_id)
    }

    /// Resume a paused execution, merging `resume_data` into its
    /// variables.
    ///
    /// Rejects executions that are not paused. The continuation starts at
    /// the successors of the paused node.
    pub async fn resume_workflow(
        self: &Arc<Self>,
        id: &ExecutionId,
        resume_data: Option<Map<String, Value>>,
    ) -> Result<(), EngineError> {
        let key = LockService::execution_key(id);
        let targets = self
            .locks
            .with_lock(&key, || async {
                let (ctx_arc, workflow) = self.ensure_in_memory(id).await?;

                let current = {
                    let mut ctx = ctx_arc.lock();
                    if ctx.status != ExecutionStatus::Paused {
                        return Err(EngineError::NotPaused(id.clone()));
                    }
                    if let Some(data) = &resume_data {
                        ctx.merge_output(data);
                    }
                    ctx.mark_running();
                    ctx.current_node_id.clone()
                };
                self.persist(&ctx_arc).await?;

                // Pauses come from HumanTask and Timer nodes, never from a
                // Decision, so every outgoing edge of the paused node is
                // followed.
                let targets = match current.and_then(|cid| workflow.node(&cid).cloned()) {
                    Some(node) => next_nodes(&workflow, &node, &Map::new()),
                    None => Vec::new(),
                };
                Ok(targets)
            })
            .await??;

        info!(execution_id = %id, "workflow execution resumed");
        let engine = Arc::clone(self);
        let id = id.clone();
        tokio::spawn(async move {
            engine.run_traversal(id, targets).await;
        });
        Ok(())
    }

    /// Cancel an execution.
    ///
    /// Running and paused executions transition to `cancelled` with an
    /// end time; a step already in flight is not aborted, but nothing
    /// further is scheduled. Terminal executions are left untouched.
    pub async fn cancel_execution(self: &Arc<Self>, id: &ExecutionId) -> Result<(), EngineError> {
        let key = LockService::execution_key(id);
        self.locks
            .with_lock(&key, || async {
                if let Some((ctx_arc, _)) = self.entry(id) {
                    {
                        let mut ctx = ctx_arc.lock();
                        if ctx.status.is_terminal() {
                            return Ok(());
                        }
                        ctx.mark_cancelled();
                    }
                    self.persist(&ctx_arc).await?;
                    self.running.remove(id);
                    info!(execution_id = %id, "workflow execution cancelled");
                    return Ok(());
                }

                match self.load_document(id).await? {
                    Some(doc) if !doc.status.is_terminal() => {
                        let mut ctx = ExecutionContext::from_document(doc);
                        ctx.mark_cancelled();
                        self.persist_context(&ctx).await?;
                        info!(execution_id = %id, "workflow execution cancelled");
                        Ok(())
                    }
                    Some(_) => Ok(()),
                    None => Err(EngineError::ExecutionNotFound(id.clone())),
                }
            })
            .await?
    }

    /// Current state of an execution: memory first, then cache, then the
    /// execution store.
    pub async fn get_execution_status(
        &self,
        id: &ExecutionId,
    ) -> Result<Option<ExecutionContext>, EngineError> {
        if let Some(entry) = self.running.get(id) {
            return Ok(Some(entry.context.lock().clone()));
        }
        Ok(self
            .load_document(id)
            .await?
            .map(ExecutionContext::from_document))
    }

    /// Install the engine's event subscriptions:
    /// `human:approved` resumes with the approval data, `human:rejected`
    /// fails the execution, `timer:expired` resumes with no data.
    pub fn install_subscriptions(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let mut stream = self.bus.watch();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                let Ok(event) = event else {
                    // Lagged behind the broadcast buffer; skip.
                    continue;
                };
                let Some(engine) = weak.upgrade() else { break };
                engine.handle_bus_event(&event).await;
            }
        });
    }

    /// Boot recovery: reload every paused execution from the store and
    /// re-arm its wake-up.
    ///
    /// Timer pauses compare their persisted `resumeAt` against the wall
    /// clock; overdue timers fire immediately, future ones get a fresh
    /// deferred `timer:expired`. Human-task pauses need no re-arm because
    /// the approval subscription is global. Call after
    /// [`install_subscriptions`](Self::install_subscriptions).
    pub async fn recover(self: &Arc<Self>) -> Result<usize, EngineError> {
        let paused = self
            .executions
            .find_by_status(ExecutionStatus::Paused)
            .await?;
        let mut recovered = 0;

        for doc in paused {
            let id = doc.id.clone();
            let Some(workflow) = self.workflows.find_by_id(&doc.workflow_id).await? else {
                warn!(execution_id = %id, "paused execution references a missing workflow");
                continue;
            };
            let context = ExecutionContext::from_document(doc);
            let current_kind = context
                .current_node_id
                .as_ref()
                .and_then(|cid| workflow.node(cid))
                .map(|node| node.kind);

            if current_kind == Some(NodeKind::Timer) {
                let delay_ms = pause_resume_at(&context)
                    .map(|at| (at - Utc::now()).num_milliseconds().max(0) as u64)
                    .unwrap_or(0);
                debug!(execution_id = %id, delay_ms, "re-arming recovered timer");
                let bus = Arc::clone(&self.bus);
                let payload = json!({"executionId": id});
                tokio::spawn(async move {
                    if delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                    bus.publish(EventName::TimerExpired, payload);
                });
            }
            recovered += 1;
        }

        info!(recovered, "paused executions recovered");
        Ok(recovered)
    }

    /// Poll an execution until it reaches a terminal status.
    pub async fn wait_until_terminal(
        &self,
        id: &ExecutionId,
        timeout: Duration,
    ) -> Result<ExecutionContext, EngineError> {
        self.wait_until(id, timeout, ExecutionStatus::is_terminal)
            .await
    }

    /// Poll an execution until it pauses (or reaches a terminal status).
    pub async fn wait_until_paused(
        &self,
        id: &ExecutionId,
        timeout: Duration,
    ) -> Result<ExecutionContext, EngineError> {
        self.wait_until(id, timeout, |status| {
            *status == ExecutionStatus::Paused || status.is_terminal()
        })
        .await
    }

    // ── Traversal ──────────────────────────────────────────────────────

    /// Drive an execution from the given targets until it pauses, fails,
    /// or drains its work stack (completion).
    async fn run_traversal(self: Arc<Self>, id: ExecutionId, initial: Vec<NodeId>) {
        let key = LockService::execution_key(&id);
        let mut stack: Vec<NodeId> = initial.into_iter().rev().collect();

        loop {
            let Some(node_id) = stack.pop() else {
                if let Err(err) = self.try_complete(&id).await {
                    warn!(execution_id = %id, error = %err, "completion bookkeeping failed");
                }
                return;
            };

            let step = self
                .locks
                .with_lock(&key, || self.execute_step(&id, node_id))
                .await;

            match step {
                Ok(Ok(StepFlow::Next(targets))) => {
                    // Depth-first: the first declared edge runs next.
                    for target in targets.into_iter().rev() {
                        stack.push(target);
                    }
                }
                Ok(Ok(StepFlow::Stop)) => return,
                Ok(Err(err)) => {
                    warn!(execution_id = %id, error = %err, "step infrastructure failure");
                    self.fail_execution(&id, &err.to_string()).await;
                    return;
                }
                Err(err) => {
                    warn!(execution_id = %id, error = %err, "execution lock unavailable");
                    self.fail_execution(&id, &err.to_string()).await;
                    return;
                }
            }
        }
    }

    /// Run one node. Caller holds the execution lock.
    async fn execute_step(
        &self,
        id: &ExecutionId,
        node_id: NodeId,
    ) -> Result<StepFlow, EngineError> {
        let Some((ctx_arc, workflow)) = self.entry(id) else {
            // Cancelled (or otherwise finished) while queued.
            return Ok(StepFlow::Stop);
        };
        if ctx_arc.lock().status != ExecutionStatus::Running {
            return Ok(StepFlow::Stop);
        }

        // A cursor pointing outside the node set completes the execution.
        let Some(node) = workflow.node(&node_id).cloned() else {
            self.finish_completed(id, &ctx_arc, &workflow).await?;
            return Ok(StepFlow::Stop);
        };

        let variables = {
            let mut ctx = ctx_arc.lock();
            ctx.set_current(node_id.clone());
            ctx.variables.clone()
        };

        self.bus.publish(
            EventName::NodeStart,
            json!({
                "executionId": id,
                "nodeId": node_id,
                "kind": node.kind,
            }),
        );
        debug!(execution_id = %id, node_id = %node_id, kind = %node.kind, "node start");

        let handler_ctx = HandlerContext::new(
            id.clone(),
            workflow.id.clone(),
            node_id.clone(),
            variables.clone(),
            Arc::clone(&self.bus),
            Arc::clone(&self.adapters),
            self.config.handler_defaults(),
        );

        let started_at = Utc::now();
        let stopwatch = Instant::now();
        let result = match self.handlers.get(node.kind) {
            Ok(handler) => handler.execute(&node, &handler_ctx).await,
            Err(err) => Err(err),
        };
        let duration_ms = stopwatch.elapsed().as_millis() as u64;

        match result {
            Ok(NodeOutcome::Success { output }) => {
                let ai_tokens = output.get("ai_tokens_used").and_then(Value::as_u64);
                let ai_cost = output.get("ai_cost").and_then(Value::as_f64);
                {
                    let mut ctx = ctx_arc.lock();
                    ctx.record_step(StepRecord {
                        node_id: node_id.clone(),
                        started_at,
                        duration_ms,
                        input: variables,
                        output: Some(output.clone()),
                        outcome: StepOutcome::Success,
                        error: None,
                        memory_bytes: current_rss_bytes(),
                    });
                    if ai_tokens.is_some() || ai_cost.is_some() {
                        ctx.note_ai_usage(ai_tokens.unwrap_or(0), ai_cost.unwrap_or(0.0));
                    }
                    ctx.merge_output(&output);
                }
                self.persist(&ctx_arc).await?;

                let targets = next_nodes(&workflow, &node, &output);
                self.publish_node_complete(id, &node_id, "success", duration_ms);
                Ok(StepFlow::Next(targets))
            }

            Ok(NodeOutcome::Pause { reason, data }) => {
                {
                    let mut ctx = ctx_arc.lock();
                    let mut pause_output = Map::new();
                    pause_output.insert("reason".into(), Value::String(reason.clone()));
                    pause_output.insert("data".into(), data);
                    ctx.record_step(StepRecord {
                        node_id: node_id.clone(),
                        started_at,
                        duration_ms,
                        input: variables,
                        output: Some(pause_output),
                        outcome: StepOutcome::Paused,
                        error: None,
                        memory_bytes: current_rss_bytes(),
                    });
                    ctx.mark_paused();
                }
                self.persist(&ctx_arc).await?;

                self.bus.publish(
                    EventName::ExecutionPaused,
                    json!({
                        "executionId": id,
                        "nodeId": node_id,
                        "reason": reason,
                    }),
                );
                info!(execution_id = %id, node_id = %node_id, reason = %reason, "execution paused");
                self.publish_node_complete(id, &node_id, "pause", duration_ms);
                Ok(StepFlow::Stop)
            }

            Err(err) => {
                let message = err.to_string();
                {
                    let mut ctx = ctx_arc.lock();
                    ctx.record_step(StepRecord {
                        node_id: node_id.clone(),
                        started_at,
                        duration_ms,
                        input: variables,
                        output: None,
                        outcome: StepOutcome::Failed,
                        error: Some(message.clone()),
                        memory_bytes: current_rss_bytes(),
                    });
                    ctx.mark_failed();
                }
                self.persist(&ctx_arc).await?;
                self.running.remove(id);

                self.publish_failure_events(id, &workflow.id, &message);
                warn!(execution_id = %id, node_id = %node_id, error = %message, "execution failed");
                self.publish_node_complete(id, &node_id, "error", duration_ms);
                Ok(StepFlow::Stop)
            }
        }
    }

    /// Complete the execution if its work stack drained while it was
    /// still running.
    async fn try_complete(self: &Arc<Self>, id: &ExecutionId) -> Result<(), EngineError> {
        let key = LockService::execution_key(id);
        self.locks
            .with_lock(&key, || async {
                let Some((ctx_arc, workflow)) = self.entry(id) else {
                    return Ok(());
                };
                if ctx_arc.lock().status != ExecutionStatus::Running {
                    return Ok(());
                }
                self.finish_completed(id, &ctx_arc, &workflow).await
            })
            .await?
    }

    async fn finish_completed(
        &self,
        id: &ExecutionId,
        ctx_arc: &Arc<Mutex<ExecutionContext>>,
        workflow: &Arc<Workflow>,
    ) -> Result<(), EngineError> {
        {
            ctx_arc.lock().mark_completed();
        }
        self.persist(ctx_arc).await?;
        self.running.remove(id);

        self.bus
            .publish(EventName::ExecutionComplete, json!({"executionId": id}));
        self.bus.publish(
            EventName::WorkflowCompleted,
            json!({"executionId": id, "workflowId": workflow.id}),
        );
        info!(execution_id = %id, "workflow execution completed");
        Ok(())
    }

    /// Mark an execution failed outside the step path (human rejection,
    /// infrastructure errors). Safe to call for executions that are no
    /// longer in memory.
    async fn fail_execution(self: &Arc<Self>, id: &ExecutionId, reason: &str) {
        let key = LockService::execution_key(id);
        let result = self
            .locks
            .with_lock(&key, || async {
                let workflow_id = if let Some((ctx_arc, workflow)) = self.entry(id) {
                    {
                        let mut ctx = ctx_arc.lock();
                        if ctx.status.is_terminal() {
                            return Ok(None);
                        }
                        ctx.mark_failed();
                    }
                    self.persist(&ctx_arc).await?;
                    self.running.remove(id);
                    workflow.id.clone()
                } else {
                    match self.load_document(id).await? {
                        Some(doc) if !doc.status.is_terminal() => {
                            let mut ctx = ExecutionContext::from_document(doc);
                            ctx.mark_failed();
                            let workflow_id = ctx.workflow_id.clone();
                            self.persist_context(&ctx).await?;
                            workflow_id
                        }
                        Some(_) => return Ok(None),
                        None => return Err(EngineError::ExecutionNotFound(id.clone())),
                    }
                };
                Ok(Some(workflow_id))
            })
            .await;

        match result {
            Ok(Ok(Some(workflow_id))) => {
                self.publish_failure_events(id, &workflow_id, reason);
                warn!(execution_id = %id, reason = %reason, "execution failed");
            }
            Ok(Ok(None)) => {}
            Ok(Err(err)) => warn!(execution_id = %id, error = %err, "failure bookkeeping failed"),
            Err(err) => warn!(execution_id = %id, error = %err, "failure bookkeeping failed"),
        }
    }

    // ── Event handling ─────────────────────────────────────────────────

    async fn handle_bus_event(self: &Arc<Self>, event: &Event) {
        let Some(id) = event
            .payload_str("executionId")
            .and_then(|raw| ExecutionId::parse(raw).ok())
        else {
            return;
        };

        match &event.name {
            EventName::HumanApproved => {
                let approval = event
                    .payload
                    .get("approvalData")
                    .and_then(Value::as_object)
                    .cloned();
                if let Err(err) = self.resume_workflow(&id, approval).await {
                    warn!(execution_id = %id, error = %err, "approval resume failed");
                }
            }
            EventName::HumanRejected => {
                self.fail_execution(&id, "Human approval rejected").await;
            }
            EventName::TimerExpired => match self.resume_workflow(&id, None).await {
                Ok(()) => {}
                Err(EngineError::NotPaused(_) | EngineError::ExecutionNotFound(_)) => {
                    debug!(execution_id = %id, "stale timer expiry ignored");
                }
                Err(err) => warn!(execution_id = %id, error = %err, "timer resume failed"),
            },
            _ => {}
        }
    }

    // ── Plumbing ───────────────────────────────────────────────────────

    fn entry(&self, id: &ExecutionId) -> Option<(Arc<Mutex<ExecutionContext>>, Arc<Workflow>)> {
        self.running
            .get(id)
            .map(|entry| (Arc::clone(&entry.context), Arc::clone(&entry.workflow)))
    }

    /// Reload an execution into memory from cache or store.
    async fn ensure_in_memory(
        &self,
        id: &ExecutionId,
    ) -> Result<(Arc<Mutex<ExecutionContext>>, Arc<Workflow>), EngineError> {
        if let Some(found) = self.entry(id) {
            return Ok(found);
        }
        let doc = self
            .load_document(id)
            .await?
            .ok_or_else(|| EngineError::ExecutionNotFound(id.clone()))?;
        let workflow = self
            .workflows
            .find_by_id(&doc.workflow_id)
            .await?
            .ok_or_else(|| EngineError::WorkflowNotFound(doc.workflow_id.clone()))?;

        let context = Arc::new(Mutex::new(ExecutionContext::from_document(doc)));
        // Only paused executions come back into the running map; anything
        // terminal is served from the store without re-registering.
        if context.lock().status == ExecutionStatus::Paused {
            self.running.insert(
                id.clone(),
                RunningEntry {
                    context: Arc::clone(&context),
                    workflow: Arc::clone(&workflow),
                },
            );
        }
        Ok((context, workflow))
    }

    async fn load_document(
        &self,
        id: &ExecutionId,
    ) -> Result<Option<ExecutionDocument>, EngineError> {
        let cache_key = LockService::execution_key(id);
        if let Some(value) = self.cache.get(&cache_key).await {
            match serde_json::from_value::<ExecutionDocument>(value) {
                Ok(doc) => return Ok(Some(doc)),
                Err(err) => warn!(execution_id = %id, error = %err, "cached document unreadable"),
            }
        }
        Ok(self.executions.find_by_id(id).await?)
    }

    async fn persist(&self, ctx_arc: &Arc<Mutex<ExecutionContext>>) -> Result<(), EngineError> {
        let context = ctx_arc.lock().clone();
        self.persist_context(&context).await
    }

    async fn persist_context(&self, context: &ExecutionContext) -> Result<(), EngineError> {
        let doc = context.to_document();
        self.executions.upsert(doc.clone()).await?;

        // Cache writes are best effort.
        match serde_json::to_value(&doc) {
            Ok(value) => {
                let cache_key = LockService::execution_key(&context.execution_id);
                self.cache
                    .set(&cache_key, value, self.config.cache_ttl())
                    .await;
            }
            Err(err) => {
                warn!(execution_id = %context.execution_id, error = %err, "cache serialization failed");
            }
        }
        Ok(())
    }

    fn publish_node_complete(&self, id: &ExecutionId, node_id: &NodeId, outcome: &str, duration_ms: u64) {
        self.bus.publish(
            EventName::NodeComplete,
            json!({
                "executionId": id,
                "nodeId": node_id,
                "outcome": outcome,
                "durationMs": duration_ms,
            }),
        );
    }

    fn publish_failure_events(&self, id: &ExecutionId, workflow_id: &WorkflowId, error: &str) {
        self.bus.publish(
            EventName::ExecutionFailed,
            json!({"executionId": id, "error": error}),
        );
        self.bus.publish(
            EventName::WorkflowFailed,
            json!({"executionId": id, "workflowId": workflow_id, "error": error}),
        );
    }

    async fn wait_until(
        &self,
        id: &ExecutionId,
        timeout: Duration,
        predicate: impl Fn(&ExecutionStatus) -> bool,
    ) -> Result<ExecutionContext, EngineError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(context) = self.get_execution_status(id).await? {
                if predicate(&context.status) {
                    return Ok(context);
                }
            }
            if Instant::now() >= deadline {
                return Err(EngineError::WaitTimeout(id.clone()));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("running", &self.running.len())
            .finish_non_exhaustive()
    }
}

/// The `resumeAt` timestamp persisted in a timer pause, if any.
fn pause_resume_at(context: &ExecutionContext) -> Option<chrono::DateTime<Utc>> {
    context
        .history
        .last()
        .and_then(|rec| rec.output.as_ref())
        .and_then(|out| out.get("data"))
        .and_then(|data| data.get("resumeAt"))
        .and_then(Value::as_str)
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc))
}

/// Targets of a node's outgoing edges, in declaration order.
///
/// For Decision sources, unconditioned edges are default paths and always
/// followed; conditioned edges are followed when the condition matches
/// the step's `decisionPath` or evaluates true against the step output.
/// Every other kind follows all of its outgoing edges.
fn next_nodes(workflow: &Workflow, node: &NodeDefinition, output: &Map<String, Value>) -> Vec<NodeId> {
    let decision_path = output.get("decisionPath").and_then(Value::as_str);

    workflow
        .outgoing(&node.id)
        .filter(|edge| {
            if node.kind != NodeKind::Decision {
                return true;
            }
            match &edge.condition {
                None => true,
                Some(condition) => {
                    decision_path == Some(condition.as_str())
                        || evaluate_condition(condition, output)
                }
            }
        })
        .map(|edge| edge.target.clone())
        .collect()
}
