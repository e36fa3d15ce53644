//! Recording delegates shared by relay and context tests.

use std::sync::{Arc, Mutex};

use crate::channel::Channel;
use crate::payload::{HostContext, Intent, ReceiverEvent, StartRequest, StartResult};
use crate::relay::{ReceiverDelegate, ReceiverDelegateRef, ServiceDelegate, ServiceDelegateRef};

pub(crate) fn event(channel: Channel, tag: &str) -> ReceiverEvent {
    ReceiverEvent::new(
        channel,
        HostContext::new("test-host", ()),
        Intent::new().with_extra("tag", tag),
    )
}

#[derive(Default)]
pub(crate) struct Recorder {
    seen: Mutex<Vec<ReceiverEvent>>,
}

impl Recorder {
    pub(crate) fn arc() -> (Arc<Recorder>, ReceiverDelegateRef) {
        let rec = Arc::new(Recorder::default());
        let dyn_ref: ReceiverDelegateRef = rec.clone();
        (rec, dyn_ref)
    }

    pub(crate) fn tags(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|ev| ev.intent.extra("tag").unwrap_or_default().to_string())
            .collect()
    }

    pub(crate) fn seqs(&self) -> Vec<u64> {
        self.seen.lock().unwrap().iter().map(|ev| ev.seq).collect()
    }

    pub(crate) fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl ReceiverDelegate for Recorder {
    fn on_receive(&self, event: &ReceiverEvent) {
        self.seen.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

pub(crate) struct ServiceRecorder {
    calls: Mutex<Vec<String>>,
    answer: StartResult,
}

impl ServiceRecorder {
    pub(crate) fn arc(answer: StartResult) -> (Arc<ServiceRecorder>, ServiceDelegateRef) {
        let rec = Arc::new(ServiceRecorder {
            calls: Mutex::new(Vec::new()),
            answer,
        });
        let dyn_ref: ServiceDelegateRef = rec.clone();
        (rec, dyn_ref)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ServiceDelegate for ServiceRecorder {
    fn on_create(&self, host: &HostContext) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("create:{}", host.label()));
    }

    fn on_start_command(&self, request: &StartRequest) -> StartResult {
        let action = request
            .intent
            .as_ref()
            .and_then(Intent::get_action)
            .unwrap_or("-");
        self.calls.lock().unwrap().push(format!(
            "start:{action}:{}:{}",
            request.flags, request.start_id
        ));
        self.answer
    }

    fn on_destroy(&self) {
        self.calls.lock().unwrap().push("destroy".to_string());
    }

    fn name(&self) -> &str {
        "service-recorder"
    }
}

/// Delegate that panics on every call.
pub(crate) struct Faulty;

impl Faulty {
    pub(crate) fn receiver() -> ReceiverDelegateRef {
        Arc::new(Faulty)
    }

    pub(crate) fn service() -> ServiceDelegateRef {
        Arc::new(Faulty)
    }
}

impl ReceiverDelegate for Faulty {
    fn on_receive(&self, event: &ReceiverEvent) {
        panic!("faulty delegate rejected seq={}", event.seq);
    }
}

impl ServiceDelegate for Faulty {
    fn on_create(&self, _host: &HostContext) {
        panic!("faulty delegate rejected onCreate");
    }

    fn on_start_command(&self, _request: &StartRequest) -> StartResult {
        panic!("faulty delegate rejected onStartCommand");
    }

    fn on_destroy(&self) {
        panic!("faulty delegate rejected onDestroy");
    }
}
