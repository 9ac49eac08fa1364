use std::path::Path;
use std::sync::Arc;

use promptgate::cli::commands::simulate::{run_script, SessionScript};
use promptgate::{CoordinatorConfig, InMemoryDismissalStore, PromptTransition, TriggerKind};

fn demo_script(name: &str) -> SessionScript {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name);
    let raw = std::fs::read_to_string(path).unwrap();
    SessionScript::from_yaml(&raw).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_reader_session_demo() {
    let script = demo_script("reader_session.yaml");
    let config = script.coordinator.clone().unwrap();
    assert_eq!(config.exit_delay_ms, 800);
    assert_eq!(config.inactivity_timeout_ms, CoordinatorConfig::default().inactivity_timeout_ms);

    let store = Arc::new(InMemoryDismissalStore::new());
    let report = run_script(&script, config, store.clone()).await.unwrap();

    let timeline: Vec<_> = report
        .timeline
        .iter()
        .map(|e| (e.kind, e.transition))
        .collect();
    assert_eq!(
        timeline,
        vec![
            (TriggerKind::Load, PromptTransition::Shown),
            (TriggerKind::Load, PromptTransition::Dismissed),
            (TriggerKind::Scroll, PromptTransition::Shown),
            (TriggerKind::Exit, PromptTransition::Abandoned),
        ]
    );
    assert_eq!(report.final_state.visible(), vec![TriggerKind::Scroll]);
    assert_eq!(store.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_returning_visitor_idles_out() {
    let script = SessionScript::from_yaml("duration_ms: 61000\n").unwrap();
    let store = Arc::new(InMemoryDismissalStore::seen());

    let report = run_script(&script, CoordinatorConfig::default(), store)
        .await
        .unwrap();

    assert_eq!(report.timeline.len(), 1);
    assert_eq!(report.timeline[0].kind, TriggerKind::Inactivity);
    assert!((60_000..61_000).contains(&report.timeline[0].elapsed_ms));
    assert!(!report.final_state.load_prompt_shown);
}
