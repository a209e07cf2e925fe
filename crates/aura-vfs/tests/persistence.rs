//! VFS over the on-disk store.

use std::sync::Arc;

use aura_storage::{FileKvStore, KvStore, KvStoreExt, MemoryKvStore, keys};
use aura_vfs::{FileRecord, SaveRequest, VfsSettings, VirtualFileSystem};
use tempfile::TempDir;

fn open(dir: &TempDir) -> VirtualFileSystem {
    let store: Arc<dyn KvStore> = Arc::new(FileKvStore::open(dir.path()).unwrap());
    VirtualFileSystem::new(store, VfsSettings::default()).unwrap()
}

#[test]
fn records_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let fs = open(&dir);
        fs.create_folder("notes", "/").unwrap();
        fs.save_file(
            SaveRequest::new("plan.md", "step one")
                .path("/notes/")
                .encrypt(true)
                .compress(true),
        )
        .unwrap();
    }

    let fs = open(&dir);
    assert!(fs.folder_exists("/notes/"));
    let plan = fs.get_file("plan.md", "/notes/").unwrap().unwrap();
    assert_eq!(plan.content, "step one");
    assert_eq!(fs.recent_entries()[0].name, "plan.md");
}

#[test]
fn stored_json_uses_record_field_names() {
    let dir = TempDir::new().unwrap();
    let fs = open(&dir);
    fs.save_file(SaveRequest::new("a.txt", "hello")).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", keys::FILES))).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["name"], "a.txt");
    assert_eq!(json[0]["originalContent"], "hello");
    assert_eq!(json[0]["type"], "text");
}

#[test]
fn reload_picks_up_external_edits() {
    let dir = TempDir::new().unwrap();
    let fs = open(&dir);
    fs.save_file(SaveRequest::new("a.txt", "hello")).unwrap();

    // Another process truncates the collection behind our back.
    std::fs::write(dir.path().join(format!("{}.json", keys::FILES)), "[]").unwrap();
    assert_eq!(fs.files().len(), 1);
    fs.reload().unwrap();
    assert!(fs.files().is_empty());
}

#[tokio::test]
async fn watchers_see_collection_writes() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileKvStore::open(dir.path()).unwrap());
    let mut folders = store.watch();
    let fs = VirtualFileSystem::new(Arc::clone(&store) as Arc<dyn KvStore>, VfsSettings::default())
        .unwrap();

    fs.create_folder("docs", "/").unwrap();
    let change = loop {
        let change = folders.recv().await.unwrap();
        if change.key == keys::FOLDERS {
            break change;
        }
    };
    assert!(change.new_value.as_deref().unwrap().contains("/docs/"));
}

fn sorted_names(files: &[FileRecord]) -> Vec<String> {
    let mut names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    names.sort();
    names
}

#[test]
fn concurrent_views_stay_in_step_with_store() {
    for round in 0..20 {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let notepad = VirtualFileSystem::new(Arc::clone(&store), VfsSettings::default()).unwrap();
        let manager = VirtualFileSystem::new(Arc::clone(&store), VfsSettings::default()).unwrap();

        std::thread::scope(|s| {
            for (tag, view) in [("a", &notepad), ("b", &manager)] {
                s.spawn(move || {
                    for i in 0..50 {
                        view.save_file(SaveRequest::new(format!("{tag}-{i}.txt"), "x"))
                            .unwrap();
                    }
                });
            }
        });

        let stored: Vec<FileRecord> = store.load_json(keys::FILES).unwrap().unwrap();
        let expected = sorted_names(&stored);
        assert_eq!(sorted_names(&notepad.files()), expected, "round {round}: notepad");
        assert_eq!(sorted_names(&manager.files()), expected, "round {round}: manager");
    }
}
