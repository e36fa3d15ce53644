//! # Demo: boot_sequence
//!
//! Simulates a cold process start where the OS fires lifecycle callbacks before the
//! application has attached its delegates.
//!
//! Shows how to:
//! - Build a [`RelayContext`] with the built-in [`LogWriter`] subscriber.
//! - Feed OS callbacks through a [`ReceiverGate`](lifecycle_relay::ReceiverGate) and a service relay.
//! - Attach delegates late with [`RelayContext::wire_up`] and watch the cache flush.
//!
//! ## Flow
//! ```text
//! OS: boot broadcast      ──► gate(Boot).dispatch  ──► cached
//! OS: alarm runner start  ──► on_create / on_start_command ──► cached, RedeliverIntent
//! app ready               ──► wire_up(delegates)   ──► boot flushed, created → started replayed
//! OS: alarm               ──► alarm.receive        ──► forwarded live
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example boot_sequence --features logging
//! ```

use std::sync::Arc;

use lifecycle_relay::{
    ACTION_BOOT_COMPLETED, Channel, Delegates, HostContext, Intent, LogWriter,
    ReceiverDelegateRef, ReceiverEvent, ReceiverFn, RelayConfig, RelayContext, ServiceDelegate,
    ServiceDelegateRef, StartRequest, StartResult, Subscribe,
};
use tracing_subscriber::EnvFilter;

/// Application-side alarm runner service.
struct AlarmRunner;

impl ServiceDelegate for AlarmRunner {
    fn on_create(&self, host: &HostContext) {
        println!("[app] alarm runner created by {}", host.label());
    }

    fn on_start_command(&self, request: &StartRequest) -> StartResult {
        let task = request
            .intent
            .as_ref()
            .and_then(|i| i.extra("task"))
            .unwrap_or("<none>");
        println!("[app] alarm runner start #{} task={task}", request.start_id);
        StartResult::NotSticky
    }

    fn on_destroy(&self) {
        println!("[app] alarm runner destroyed");
    }

    fn name(&self) -> &str {
        "alarm-runner"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let ctx = RelayContext::builder(RelayConfig::default())
        .with_subscribers(subs)
        .build();

    // Process start: the OS delivers callbacks while the application is still loading.
    let boot_gate = ctx.gate(Channel::Boot).ok_or("boot gate")?;
    boot_gate.dispatch(
        Some(HostContext::new("BootReceiver", ())),
        Intent::action(ACTION_BOOT_COMPLETED),
    )?;
    if let Err(err) = boot_gate.dispatch(
        Some(HostContext::new("BootReceiver", ())),
        Intent::action("android.intent.action.SCREEN_ON"),
    ) {
        println!("[os] rejected: {}", err.as_message());
    }

    let runner = ctx.alarm_runner();
    runner.on_create(HostContext::new("AlarmRunnerService", ()));
    let answer = runner.on_start_command(StartRequest::new(
        Some(Intent::new().with_extra("task", "collect-location")),
        0,
        1,
    ));
    println!("[os] start answered with {} ({})", answer.as_label(), answer.as_raw());
    println!("[os] pending before init: {:?}", ctx.pending_channels());

    // Application bootstrap.
    let on_boot: ReceiverDelegateRef = ReceiverFn::arc("reschedule", |ev: &ReceiverEvent| {
        println!("[app] boot #{} handled, rescheduling alarms", ev.seq);
    });
    let on_alarm: ReceiverDelegateRef = ReceiverFn::arc("alarm", |ev: &ReceiverEvent| {
        println!("[app] alarm #{} handled", ev.seq);
    });
    let alarm_runner: ServiceDelegateRef = Arc::new(AlarmRunner);
    let delegates = Delegates::default()
        .with_boot(on_boot)
        .with_alarm(on_alarm)
        .with_alarm_runner(alarm_runner);

    let flushed = ctx.wire_up(&delegates);
    println!("[app] wired up, {flushed} cached calls delivered");

    // Steady state: calls go straight through.
    ctx.alarm()
        .receive(HostContext::new("AlarmReceiver", ()), Intent::new());
    runner.on_destroy();

    ctx.shutdown().await;
    Ok(())
}
