/*!
 * WebDAV Path Helpers
 *
 * Helpers that turn a Files-app selection into the WebDAV paths the OCR
 * pipeline reads from and writes to.
 */

/// Extension given to the recognized-text sibling file
pub const RESULT_EXTENSION: &str = ".txt";

/// WebDAV path of a user's file, relative to `/remote.php/dav`
pub fn source_dav_path(user_name: &str, directory: &str, name: &str) -> String {
    if directory == "/" {
        format!("/files/{}/{}", user_name, name)
    } else {
        format!("/files/{}{}/{}", user_name, directory, name)
    }
}

/// Path of the text file stored next to `source_path`, with the final
/// extension swapped for `.txt`
pub fn result_dav_path(source_path: &str) -> String {
    let extension = extract_extension(source_path);
    let stem = &source_path[..source_path.len() - extension.len()];
    format!("{}{}", stem, RESULT_EXTENSION)
}

/// Final extension of the last path segment, including the dot.
/// Returns an empty string when the last segment has no dot.
pub fn extract_extension(path: &str) -> &str {
    let file_name_start = path.rfind('/').map(|pos| pos + 1).unwrap_or(0);
    match path[file_name_start..].rfind('.') {
        Some(pos) => &path[file_name_start + pos..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_directory_paths() {
        let source = source_dav_path("alice", "/", "scan.jpg");
        assert_eq!(source, "/files/alice/scan.jpg");
        assert_eq!(result_dav_path(&source), "/files/alice/scan.txt");
    }

    #[test]
    fn test_nested_directory_paths() {
        let source = source_dav_path("alice", "/photos", "scan.jpg");
        assert_eq!(source, "/files/alice/photos/scan.jpg");
        assert_eq!(result_dav_path(&source), "/files/alice/photos/scan.txt");
    }

    #[test]
    fn test_only_final_extension_is_replaced() {
        let source = source_dav_path("alice", "/photos", "a.b.jpeg");
        assert_eq!(result_dav_path(&source), "/files/alice/photos/a.b.txt");
    }

    #[test]
    fn test_name_without_extension_gets_txt_appended() {
        assert_eq!(result_dav_path("/files/alice/README"), "/files/alice/README.txt");
    }

    #[test]
    fn test_dots_in_directories_are_ignored() {
        assert_eq!(extract_extension("/files/alice/v1.2/scan"), "");
        assert_eq!(result_dav_path("/files/alice/v1.2/scan"), "/files/alice/v1.2/scan.txt");
    }

    #[test]
    fn test_extension_is_kept_verbatim() {
        assert_eq!(extract_extension("photo.JPEG"), ".JPEG");
        assert_eq!(extract_extension("/files/bob/.hidden"), ".hidden");
        assert_eq!(extract_extension("/files/bob/trailing."), ".");
    }
}
