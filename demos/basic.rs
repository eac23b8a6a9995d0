//! # Example: basic
//!
//! Minimal dispatcher usage: one sync and one async handler on a single key.
//!
//! Demonstrates how to:
//! - Define handlers with [`SyncHandlerFn`] and [`HandlerFn`].
//! - Subscribe them (twice, to show identity dedup).
//! - Emit synchronously, then asynchronously in both modes.
//! - Inspect an aggregated failure and unsubscribe.
//!
//! ## Flow
//! ```text
//! Dispatcher::new()
//!     ├─► subscribe("order.placed", audit)     (second subscribe is a no-op)
//!     ├─► subscribe("order.placed", notify)
//!     ├─► emit_sync       ─► audit, notify (detached)
//!     ├─► emit_async      ─► audit ┬ notify  ─► join
//!     ├─► emit_async_with_mode(Sequential) ─► audit ─► notify
//!     └─► subscribe(flaky) ─► emit_async ─► AggregateFailure
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::time::Duration;

use emitvisor::{Dispatcher, EmitError, EmitMode, HandlerFn, HandlerRef, SyncHandlerFn};

#[derive(Clone, Debug)]
struct RequestCtx {
    request_id: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // 1. Create a dispatcher with the default config (10 handlers per key)
    let bus: Dispatcher<&'static str, RequestCtx, String> = Dispatcher::new();

    // 2. Define handlers
    let audit: HandlerRef<RequestCtx, String> =
        SyncHandlerFn::arc("audit", |ctx: RequestCtx, order: String| {
            println!("[audit] request={} order={order}", ctx.request_id);
            Ok::<_, std::io::Error>(())
        });
    let notify: HandlerRef<RequestCtx, String> =
        HandlerFn::arc("notify", |ctx: RequestCtx, order: String| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            println!("[notify] request={} order={order} sent", ctx.request_id);
            Ok::<_, std::io::Error>(())
        });

    // 3. Subscribe; the same handler twice stays a single entry
    bus.subscribe("order.placed", audit.clone())?;
    bus.subscribe("order.placed", audit.clone())?;
    bus.subscribe("order.placed", notify.clone())?;
    println!("handlers: {}", bus.handler_count("order.placed"));

    // 4. Fire and forget: notify runs detached on the runtime
    bus.emit_sync("order.placed", RequestCtx { request_id: 1 }, "A-1".into())?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // 5. Await all handlers, concurrently then one by one
    bus.emit_async("order.placed", RequestCtx { request_id: 2 }, "A-2".into())
        .await?;
    bus.emit_async_with_mode(
        "order.placed",
        RequestCtx { request_id: 3 },
        "A-3".into(),
        EmitMode::Sequential,
    )
    .await?;

    // 6. Failures from a concurrent emission are aggregated
    let flaky: HandlerRef<RequestCtx, String> =
        HandlerFn::arc("flaky", |_ctx: RequestCtx, _order: String| async {
            Err::<(), _>(std::io::Error::other("inventory service unavailable"))
        });
    bus.subscribe("order.placed", flaky.clone())?;

    match bus
        .emit_async("order.placed", RequestCtx { request_id: 4 }, "A-4".into())
        .await
    {
        Err(EmitError::Aggregate(agg)) => {
            println!("{agg}");
            for err in agg.errors() {
                println!("  - {err}");
            }
        }
        other => println!("unexpected outcome: {other:?}"),
    }

    // 7. Unsubscribe one handler, then the whole key
    bus.unsubscribe("order.placed", &flaky);
    println!("removed: {}", bus.unsubscribe_all("order.placed"));
    Ok(())
}
