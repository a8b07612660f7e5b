/// Common utilities shared by the DAV and OCS calls

/// User-Agent sent with every request to the platform
pub fn build_user_agent() -> String {
    format!("ocr-text/{} (Nextcloud-ExApp)", env!("CARGO_PKG_VERSION"))
}

/// Join the normalized root with the WebDAV endpoint and a `/files/...` path.
///
/// Each segment of `dav_path` is percent-encoded, so names containing `#`,
/// `?`, `%` or spaces address the file they name.
pub fn dav_url(root_url: &str, dav_path: &str) -> String {
    let encoded: Vec<String> = dav_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/remote.php/dav{}", root_url, encoded.join("/"))
}
