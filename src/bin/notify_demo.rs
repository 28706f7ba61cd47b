//! Demo that pushes one synthetic warning per severity tier through the
//! multiplexer (stdout/log only when channels disabled).

use wxwatch::{Notifier, NotifierMux, SeverityTier, WarningOccurrence};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let mux = NotifierMux::from_env();

    let seq = [
        ("Strong Wind Warning", SeverityTier::Minor),
        ("Severe Thunderstorm Warning", SeverityTier::Major),
        ("Tornado Warning", SeverityTier::Deadly),
        ("Flood Watch", SeverityTier::Default),
    ];

    for (i, (title, severity)) in seq.into_iter().enumerate() {
        let occ = WarningOccurrence {
            identity: format!("IDQ21037-demo-{i}"),
            title: title.to_string(),
            message: "Demo bulletin.\n\nNot a real warning.".to_string(),
        };
        if let Err(e) = mux.notify(&occ, severity).await {
            eprintln!("notify failed: {e:#}");
        }
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    }

    println!("notify-demo done");
}
