//! End-to-end terminal scenarios over a shared in-memory store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use aura_storage::KvStore;
use aura_terminal::{
    FontSize, OutputKind, QuantumState, Session, TerminalSettings, Theme, completion,
};
use aura_test::{TestTerminal, memory_store};

#[tokio::test]
async fn test_chained_line_applies_each_segment_and_records_once() {
    let t = TestTerminal::new();
    let out = t.run("theme dark && font large").await;

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| r.kind == OutputKind::Success));
    let state = t.session.get();
    assert_eq!(state.theme, Theme::Dark);
    assert_eq!(state.font_size, FontSize::Large);
    assert_eq!(state.command_history, vec!["theme dark && font large"]);
}

#[tokio::test]
async fn test_unknown_command_yields_single_error() {
    let t = TestTerminal::new();
    let before = t.session.get();

    let out = t.run("frobnicate").await;

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, OutputKind::Error);
    assert_eq!(
        out[0].content,
        "Command not found: frobnicate. Type 'help' for available commands."
    );
    let after = t.session.get();
    assert_eq!(after.command_history, vec!["frobnicate"]);
    assert_eq!(after.theme, before.theme);
    assert_eq!(after.current_directory, before.current_directory);
}

#[tokio::test]
async fn test_cd_up_at_root_is_error_and_keeps_directory() {
    let t = TestTerminal::new();
    assert_eq!(t.kinds("cd /").await, vec![OutputKind::Success]);

    let out = t.run("cd ..").await;
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind, OutputKind::Error);
    assert_eq!(t.session.get().current_directory, "/");
}

#[tokio::test]
async fn test_cd_navigation() {
    let t = TestTerminal::new();
    t.run("cd ..").await;
    assert_eq!(t.session.get().current_directory, "/home/");
    t.run("cd aura/documents").await;
    assert_eq!(t.session.get().current_directory, "/home/aura/documents/");
    t.run("cd").await;
    assert_eq!(t.session.get().current_directory, "/home/aura/");

    assert_eq!(t.kinds("cd nowhere").await, vec![OutputKind::Error]);
    assert_eq!(t.session.get().current_directory, "/home/aura/");
}

#[tokio::test]
async fn test_touch_ls_cat_rm_round_trip() {
    let t = TestTerminal::new();

    assert_eq!(t.kinds("touch a.txt").await, vec![OutputKind::Success]);

    let listing = t.run("ls").await;
    assert_eq!(listing.len(), 1);
    assert!(listing[0].content.contains("📄 a.txt  0 B"));

    let cat = t.run("cat a.txt").await;
    assert_eq!(cat.len(), 1);
    assert_eq!(cat[0].kind, OutputKind::Info);
    assert_eq!(cat[0].content, "");
    let record = t.vfs.get_file("a.txt", "/home/aura/").unwrap().unwrap();
    assert_eq!(record.content, "");
    assert_eq!(record.size, 0);

    assert_eq!(t.kinds("rm a.txt").await, vec![OutputKind::Success]);
    let listing = t.run("ls").await;
    assert!(!listing[0].content.contains("a.txt"));
}

#[tokio::test]
async fn test_touch_existing_updates_and_rejects_bad_names() {
    let t = TestTerminal::new();
    t.run("touch a.txt").await;
    let out = t.run("touch a.txt b<c").await;
    assert_eq!(out[0].kind, OutputKind::Warning);
    assert!(out[0].content.contains("Updated 1 file(s)"));
    assert!(out[0].content.contains("Invalid filename: b<c"));
    assert_eq!(t.vfs.files_in_path("/home/aura/").len(), 1);
}

#[tokio::test]
async fn test_mkdir_with_and_without_parents() {
    let t = TestTerminal::new();

    let out = t.run("mkdir deep/er").await;
    assert_eq!(out[0].kind, OutputKind::Warning);
    assert!(!t.vfs.folder_exists("/home/aura/deep/"));

    let out = t.run("mkdir -p deep/er").await;
    assert_eq!(out[0].kind, OutputKind::Success);
    assert!(t.vfs.folder_exists("/home/aura/deep/"));
    assert!(t.vfs.folder_exists("/home/aura/deep/er/"));

    let out = t.run("mkdir deep").await;
    assert!(out[0].content.contains("Already exists"));

    assert_eq!(t.kinds("cd deep/er").await, vec![OutputKind::Success]);
}

#[tokio::test]
async fn test_rmdir_cascades_and_moves_out() {
    let t = TestTerminal::new();
    t.run("mkdir -p docs/old && cd docs/old && write note.txt hello").await;
    assert_eq!(t.session.get().current_directory, "/home/aura/docs/old/");

    assert_eq!(t.kinds("rmdir /home/aura/docs").await, vec![OutputKind::Success]);
    assert!(!t.vfs.folder_exists("/home/aura/docs/old/"));
    assert!(t.vfs.files().is_empty());
    assert_eq!(t.session.get().current_directory, "/home/aura/");

    assert_eq!(t.kinds("rmdir /usr").await, vec![OutputKind::Error]);
}

#[tokio::test]
async fn test_write_honours_encryption_flag() {
    let t = TestTerminal::new();
    t.run("encrypt on").await;
    let out = t.run("write secret.md -z top secret plans").await;
    assert!(out[0].content.contains("compressed, encrypted"));

    let stored = t.vfs.files_in_path("/home/aura/").pop().unwrap();
    assert!(stored.is_encrypted && stored.is_compressed);
    assert_ne!(stored.content, "top secret plans");

    let cat = t.run("cat secret.md").await;
    assert_eq!(cat[0].content, "top secret plans");

    let found = t.run("find plans").await;
    assert!(found[0].content.contains("/home/aura/secret.md"));
}

#[tokio::test]
async fn test_launch_records_app_and_payload() {
    let t = TestTerminal::new();
    t.run("launch notepad notes.md && run notepad && launch doom").await;

    let launches = t.launcher.launches();
    assert_eq!(launches.len(), 2);
    assert_eq!(
        launches[0].payload,
        Some(serde_json::json!({ "file": "notes.md", "path": "/home/aura/" }))
    );
    assert_eq!(t.session.get().open_apps, vec!["notepad"]);

    t.run("settings ui").await;
    assert_eq!(t.launcher.apps().last().map(String::as_str), Some("settings"));
}

#[tokio::test]
async fn test_settings_set_get_reset_export() {
    let t = TestTerminal::new();

    assert_eq!(
        t.kinds("settings set fontSize small").await,
        vec![OutputKind::Success]
    );
    assert_eq!(t.session.get().font_size, FontSize::Small);

    let out = t.run("settings get fontSize").await;
    assert_eq!(out[0].content, "fontSize = small");

    assert_eq!(t.kinds("settings set theme neon").await, vec![OutputKind::Error]);
    assert_eq!(t.kinds("settings set colour red").await, vec![OutputKind::Error]);
    assert_eq!(t.kinds("settings frobnicate").await, vec![OutputKind::Error]);

    t.run("settings reset").await;
    let state = t.session.get();
    assert_eq!(state.font_size, FontSize::Medium);
    assert_eq!(state.command_history.len(), 6);

    let export = t.run("settings export").await;
    assert!(export[0].content.contains("\"version\": \"1.0\""));
    assert!(export[0].content.contains("\"exportedAt\""));
}

#[tokio::test]
async fn test_quantum_settles_on_final_state() {
    let t = TestTerminal::new();
    let out = t.run("quantum").await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].kind, OutputKind::Success);
    assert!(QuantumState::OUTCOMES.contains(&t.session.get().quantum_state));
}

#[tokio::test]
async fn test_neural_toggle() {
    let t = TestTerminal::new();
    t.run("neural").await;
    assert!(t.session.get().is_neural_active);
    t.run("neural deactivate").await;
    assert!(!t.session.get().is_neural_active);
    assert_eq!(t.kinds("neural sideways").await, vec![OutputKind::Error]);
}

#[tokio::test]
async fn test_effects_run_instantly_when_disabled() {
    let t = TestTerminal::new();
    let started = Instant::now();
    let matrix = t.run("matrix").await;
    let neo = t.run("neo wake-up").await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(matrix.len() > 10);
    assert_eq!(neo.last().unwrap().kind, OutputKind::Success);
}

#[tokio::test(start_paused = true)]
async fn test_effects_pause_when_enabled() {
    let settings = TerminalSettings {
        effect_speed: 1.0,
        ..TerminalSettings::default()
    };
    let t = TestTerminal::with_settings(memory_store(), settings);
    let started = tokio::time::Instant::now();
    t.run("quantum").await;
    assert!(started.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let store: Arc<dyn KvStore> = memory_store();
    {
        let t = TestTerminal::with_store(Arc::clone(&store));
        t.run("theme glassy && cd / && touch x.json").await;
    }
    let session = Session::load(Arc::clone(&store), &TerminalSettings::instant()).unwrap();
    let state = session.get();
    assert_eq!(state.theme, Theme::Glassy);
    assert_eq!(state.current_directory, "/");

    let t = TestTerminal::with_store(store);
    let listing = t.run("ls").await;
    assert!(listing[0].content.contains("x.json"));
}

#[tokio::test]
async fn test_clear_resets_output_and_help_lists_commands() {
    let t = TestTerminal::new();
    let out = t.run("help && clear").await;
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].content, "Terminal cleared");

    let help = t.run("help").await;
    assert!(help[0].content.contains("mkdir [-p] <dir> [dir...]"));
    let one = t.run("help open").await;
    assert!(one[0].content.contains("Aliases: open, run"));
}

#[tokio::test]
async fn test_status_and_history() {
    let t = TestTerminal::new();
    t.run("encrypt on").await;
    let status = t.run("status sec").await;
    assert!(status[0].content.contains("ENABLED"));
    assert_eq!(t.kinds("status bogus").await, vec![OutputKind::Error]);

    let history = t.run("history 2").await;
    assert_eq!(history[0].content, "   3  status bogus\n   4  history 2");
}

#[tokio::test]
async fn test_completion() {
    let t = TestTerminal::new();
    t.run("touch notes.md && mkdir projects-old").await;

    let d = &t.dispatcher;
    assert_eq!(completion::complete(d, "hist").as_deref(), Some("history"));
    assert_eq!(completion::complete(d, "THE").as_deref(), Some("theme"));
    assert_eq!(completion::complete(d, "cat NO").as_deref(), Some("cat notes.md"));
    assert_eq!(
        completion::complete(d, "cd projects-").as_deref(),
        Some("cd projects-old/")
    );
    assert_eq!(completion::complete(d, "pwd && neu").as_deref(), Some("pwd && neural"));
    // `cat`, `cd` and `clear` all start with `c`.
    assert!(completion::complete(d, "c").is_none());
    assert!(completion::complete(d, "cat zzz").is_none());
    assert_eq!(completion::complete(d, "cd docu").as_deref(), Some("cd documents/"));

    let (start, mut matches) = completion::suggestions(d, "ls pro");
    matches.sort();
    assert_eq!(start, 3);
    assert_eq!(matches, vec!["projects-old/", "projects/"]);
}
