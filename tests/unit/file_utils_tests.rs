/*!
 * Tests for file and directory utilities
 */

use doctrans::file_utils::FileManager;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_find_files_shouldRecurseAndMatchExtension() {
    let dir = create_temp_dir().unwrap();
    create_test_file(dir.path(), "a.txt", "A.").unwrap();
    create_test_file(dir.path(), "nested/b.TXT", "B.").unwrap();
    create_test_file(dir.path(), "c.md", "C.").unwrap();

    let files = FileManager::find_files(dir.path(), ".txt").unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| FileManager::file_exists(f)));
}

#[test]
fn test_write_to_file_shouldCreateParentDirectories() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("deep/er/out.txt");

    FileManager::write_to_file(&path, "Bonjour.").unwrap();

    assert_eq!(FileManager::read_to_string(&path).unwrap(), "Bonjour.");
    assert!(FileManager::dir_exists(dir.path().join("deep/er")));
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let dir = create_temp_dir().unwrap();
    assert!(FileManager::read_to_string(dir.path().join("missing.txt")).is_err());
}

#[test]
fn test_generate_output_path_shouldKeepExtension() {
    let path = FileManager::generate_output_path("/in/chapter.1.txt", "/in", "es", "txt");
    assert_eq!(path, std::path::PathBuf::from("/in/chapter.1.es.txt"));
}
