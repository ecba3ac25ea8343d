//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::{SessionHandle, SessionRuntime, SessionView};
use crate::agent::{
    AgentTransport, ChatRequest, ChatResponse, Dispatcher, HealthStatus, RequestContext,
    TransportError,
};
use crate::transcript::test_clock::FixedClock;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that returns queued responses
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ChatResponse, TransportError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: ChatResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connect("No mock response queued")))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentTransport for MockTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        self.next(request)
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus::Online {
            status: "mock".to_string(),
        }
    }
}

// ============================================================================
// Gated Mock Transport (for in-flight testing)
// ============================================================================

/// Mock transport whose calls block until the test releases them
pub struct GatedMockTransport {
    inner: MockTransport,
    gate: Notify,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl GatedMockTransport {
    pub fn new() -> Self {
        Self {
            inner: MockTransport::new(),
            gate: Notify::new(),
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_response(&self, response: ChatResponse) {
        self.inner.queue_response(response);
    }

    /// Let one blocked (or the next) request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl AgentTransport for GatedMockTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_one();
        self.gate.notified().await;
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connect("No mock response queued")))
    }

    async fn health(&self) -> HealthStatus {
        self.inner.health().await
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// A running session wired to a test transport
pub struct TestRuntime<T: AgentTransport + 'static> {
    pub handle: SessionHandle,
    pub transport: Arc<T>,
}

impl<T: AgentTransport + 'static> TestRuntime<T> {
    pub fn start(transport: T) -> Self {
        let transport = Arc::new(transport);
        let dispatcher = Dispatcher::new(
            Arc::clone(&transport),
            RequestContext::new("Terminal 2", "SFO"),
            Arc::new(FixedClock),
        );
        let handle = SessionRuntime::spawn(dispatcher, Arc::new(FixedClock));
        Self { handle, transport }
    }

    /// Wait (bounded) for a snapshot matching `predicate`
    pub async fn wait_for(&self, predicate: impl FnMut(&SessionView) -> bool) -> SessionView {
        tokio::time::timeout(WAIT_TIMEOUT, self.handle.wait_for(predicate))
            .await
            .expect("timed out waiting for session view")
            .expect("session runtime stopped")
    }

    /// Wait until the log holds `len` messages and the session is idle
    pub async fn wait_for_idle_with(&self, len: usize) -> SessionView {
        self.wait_for(|v| !v.busy && v.messages.len() == len).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{CONNECTION_LOST_TEXT, NO_RESPONSE_TEXT};
    use crate::quick_action::QuickAction;
    use crate::transcript::Role;

    #[tokio::test]
    async fn test_mock_transport() {
        let mock = MockTransport::new();
        mock.queue_response(ChatResponse::reply("Hello"));
        let request = ChatRequest::new("hi", &RequestContext::new("Terminal 2", "SFO"));

        let response = mock.post_chat(&request).await.unwrap();
        assert_eq!(response.reply_text(), Some("Hello"));

        // Second call should fail (no more responses)
        assert!(mock.post_chat(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_simple_round_trip() {
        let transport = MockTransport::new();
        transport.queue_response(ChatResponse::reply("Nearest coffee is at **Gate 54**"));
        let rt = TestRuntime::start(transport);

        rt.handle.submit("Where is the nearest coffee?").await.unwrap();
        let view = rt.wait_for_idle_with(3).await;

        assert_eq!(view.messages[1].role(), Role::User);
        assert_eq!(view.messages[1].content(), "Where is the nearest coffee?");
        assert_eq!(view.messages[2].role(), Role::Agent);
        assert_eq!(view.messages[2].content(), "Nearest coffee is at **Gate 54**");
        assert!(!view.quick_actions_visible);
    }

    #[tokio::test]
    async fn test_n_submissions_alternate_in_order() {
        let transport = MockTransport::new();
        for i in 0..4 {
            transport.queue_response(ChatResponse::reply(format!("answer {i}")));
        }
        let rt = TestRuntime::start(transport);

        for i in 0..4 {
            rt.handle.submit(format!("question {i}")).await.unwrap();
            rt.wait_for_idle_with(1 + 2 * (i + 1)).await;
        }

        let view = rt.handle.view();
        assert_eq!(view.messages.len(), 9);
        for i in 0..4 {
            assert_eq!(view.messages[1 + 2 * i].role(), Role::User);
            assert_eq!(view.messages[1 + 2 * i].content(), format!("question {i}"));
            assert_eq!(view.messages[2 + 2 * i].role(), Role::Agent);
            assert_eq!(view.messages[2 + 2 * i].content(), format!("answer {i}"));
        }
        assert_eq!(rt.transport.recorded_requests().len(), 4);
    }

    #[tokio::test]
    async fn test_blank_submission_never_goes_busy() {
        let rt = TestRuntime::start(MockTransport::new());
        let mut rx = rt.handle.subscribe();
        rx.borrow_and_update();

        rt.handle.submit("   ").await.unwrap();
        rt.handle.submit("").await.unwrap();
        // Marker event: once it is visible, both submissions were processed
        rt.handle.set_draft("marker").await.unwrap();
        let view = rt.wait_for(|v| v.draft == "marker").await;

        assert_eq!(view.messages.len(), 1);
        assert!(!view.busy);
        assert!(rt.transport.recorded_requests().is_empty());
        // Only the draft change was published
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().draft, "marker");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_at_most_one_request_in_flight() {
        let transport = GatedMockTransport::new();
        transport.queue_response(ChatResponse::reply("first answer"));
        transport.queue_response(ChatResponse::reply("never requested"));
        let started = Arc::clone(&transport.request_started);
        let rt = TestRuntime::start(transport);

        rt.handle.submit("first").await.unwrap();
        started.notified().await;
        assert!(rt.wait_for(|v| v.busy).await.busy);

        rt.handle.submit("second").await.unwrap();
        rt.handle.submit_draft().await.unwrap();
        rt.handle.set_draft("marker").await.unwrap();
        let view = rt.wait_for(|v| v.draft == "marker").await;
        assert!(view.busy);
        assert_eq!(view.messages.len(), 2);

        rt.transport.release();
        let view = rt.wait_for_idle_with(3).await;
        assert_eq!(view.messages[2].content(), "first answer");
        assert_eq!(rt.transport.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_recovers_to_idle() {
        let transport = MockTransport::new();
        transport.queue_error(TransportError::connect("connection refused"));
        transport.queue_response(ChatResponse::reply("back online"));
        let rt = TestRuntime::start(transport);

        rt.handle.submit("hello").await.unwrap();
        let view = rt.wait_for_idle_with(3).await;
        assert_eq!(view.messages[2].role(), Role::Agent);
        assert_eq!(view.messages[2].content(), CONNECTION_LOST_TEXT);

        // Session is immediately usable again
        rt.handle.submit("hello again").await.unwrap();
        let view = rt.wait_for_idle_with(5).await;
        assert_eq!(view.messages[4].content(), "back online");
    }

    #[tokio::test]
    async fn test_empty_payload_fallback() {
        let transport = MockTransport::new();
        transport.queue_response(ChatResponse::default());
        let rt = TestRuntime::start(transport);

        rt.handle.submit("hello").await.unwrap();
        let view = rt.wait_for_idle_with(3).await;
        assert_eq!(view.messages[2].content(), NO_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_quick_action_then_submit_draft() {
        let transport = MockTransport::new();
        transport.queue_response(ChatResponse::reply("Restrooms are next to Gate 60"));
        let rt = TestRuntime::start(transport);

        rt.handle.quick_action(QuickAction::Restrooms).await.unwrap();
        let view = rt.wait_for(|v| !v.draft.is_empty()).await;
        assert_eq!(view.draft, "Where are the restrooms?");
        assert_eq!(view.messages.len(), 1);
        assert!(rt.transport.recorded_requests().is_empty());

        rt.handle.submit_draft().await.unwrap();
        let view = rt.wait_for_idle_with(3).await;
        assert!(view.draft.is_empty());
        assert_eq!(rt.transport.recorded_requests()[0].message, "Where are the restrooms?");
    }

    #[tokio::test]
    async fn test_runtime_stops_when_handles_dropped() {
        let dispatcher = Dispatcher::new(
            Arc::new(MockTransport::new()),
            RequestContext::new("Terminal 2", "SFO"),
            Arc::new(FixedClock),
        );
        let (runtime, handle) = SessionRuntime::new(dispatcher, Arc::new(FixedClock));
        let task = tokio::spawn(runtime.run());
        drop(handle);
        tokio::time::timeout(WAIT_TIMEOUT, task)
            .await
            .expect("runtime did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_submission_after_handles_dropped_resolves_locally() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_response(ChatResponse::reply("never delivered"));
        let dispatcher = Dispatcher::new(
            Arc::clone(&transport),
            RequestContext::new("Terminal 2", "SFO"),
            Arc::new(FixedClock),
        );
        let (runtime, handle) = SessionRuntime::new(dispatcher, Arc::new(FixedClock));
        let view_rx = handle.subscribe();

        // Queued before the loop runs; no sender is left by the time it is processed
        handle.submit("Status of UA400").await.unwrap();
        drop(handle);
        tokio::time::timeout(WAIT_TIMEOUT, runtime.run())
            .await
            .expect("runtime did not stop");

        let view = view_rx.borrow().clone();
        assert!(!view.busy);
        assert_eq!(view.messages.len(), 3);
        assert_eq!(view.messages[1].content(), "Status of UA400");
        assert_eq!(view.messages[2].role(), Role::Agent);
        assert_eq!(view.messages[2].content(), CONNECTION_LOST_TEXT);
        assert!(transport.recorded_requests().is_empty());
    }
}
