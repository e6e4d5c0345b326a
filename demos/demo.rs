//! # Demo: order pipeline
//!
//! Shows how to:
//! - Implement the [`Listener`] trait and wrap closures with [`ListenerFn`].
//! - Order listeners by priority and stop a pass with `break_loop`.
//! - Collect failures instead of aborting, and inspect the [`CallReport`].
//! - Route events through an [`EventManager`] and its `temp` group.
//! - Dispatch asynchronously from a tokio runtime.
//!
//! ## Flow
//! ```text
//! order.placed (Collect)
//!   ├─► validate  (priority 100)  rejects empty orders ─► break_loop
//!   ├─► inventory (priority 50)   fails for sku "X"    ─► recorded in CallReport
//!   └─► audit     (priority 0)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=debug cargo run --example demo
//! ```

use std::sync::{Arc, Weak};

use eventvisor::{
    CallReport, Event, EventManager, FailurePolicy, Listener, ListenerError, ListenerFn,
    ListenerId, TEMP_GROUP,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Order {
    id: u64,
    skus: Vec<String>,
}

/// Rejects empty orders by stopping the pass.
struct Validator {
    id: ListenerId,
    event: Weak<Event<Order>>,
}

impl Listener<Order> for Validator {
    fn id(&self) -> &ListenerId {
        &self.id
    }

    fn exec(&self, order: &Order) -> Result<(), ListenerError> {
        if order.skus.is_empty() {
            println!("[validate] order {} is empty, stopping", order.id);
            if let Some(ev) = self.event.upgrade() {
                ev.break_loop();
            }
        }
        Ok(())
    }
}

fn print_report(label: &str, report: &CallReport) {
    println!(
        "[{label}] executed={} skipped={} broken={} failed={:?}",
        report.executed,
        report.skipped,
        report.broken,
        report.failed_listeners()
    );
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eventvisor=info")),
        )
        .init();

    let placed: Arc<Event<Order>> = Arc::new(
        Event::builder("order.placed")
            .with_failure_policy(FailurePolicy::Collect)
            .build()?,
    );

    placed.add_listener_with_priority(
        Arc::new(Validator {
            id: ListenerId::new("validate")?,
            event: Arc::downgrade(&placed),
        }),
        100,
    );
    placed.add_listener_with_priority(
        ListenerFn::arc("inventory", |order: &Order| {
            if order.skus.iter().any(|s| s == "X") {
                return Err(ListenerError::fail("sku X is out of stock"));
            }
            println!("[inventory] reserved {:?}", order.skus);
            Ok(())
        })?,
        50,
    );
    placed.add_listener(ListenerFn::arc("audit", |order: &Order| {
        println!("[audit] order {}", order.id);
        Ok::<_, ListenerError>(())
    })?);

    placed.do_before_each_listener_call(|l: &dyn Listener<Order>| {
        tracing::debug!(listener = %l.id(), "about to run");
        Ok(())
    });

    let ok = placed.call(&Order {
        id: 1,
        skus: vec!["A".into(), "B".into()],
    })?;
    print_report("order 1", &ok);

    let partial = placed.call(&Order {
        id: 2,
        skus: vec!["X".into()],
    })?;
    print_report("order 2", &partial);

    let empty = placed
        .call_async(Order {
            id: 3,
            skus: Vec::new(),
        })
        .await?;
    print_report("order 3", &empty);

    let manager: EventManager<Order> = EventManager::new();
    manager.register_event(Arc::clone(&placed))?;

    let welcome: Arc<Event<Order>> = Arc::new(Event::new("order.first")?);
    welcome.add_listener(ListenerFn::arc("welcome", |order: &Order| {
        println!("[welcome] first order {}", order.id);
        Ok::<_, ListenerError>(())
    })?);
    manager.register_event_in(TEMP_GROUP, welcome)?;

    manager.call_default("order.placed", &Order { id: 4, skus: vec!["C".into()] })?;
    manager.call(TEMP_GROUP, "order.first", &Order { id: 4, skus: Vec::new() })?;
    println!(
        "[manager] groups={:?} temp still holds order.first: {}",
        manager.list_groups(),
        manager.get_event_in(TEMP_GROUP, "order.first").is_some()
    );

    Ok(())
}
