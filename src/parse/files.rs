//! Directory listings from inside containers.
//!
//! There is no JSON-capable listing command inside an arbitrary container,
//! so the clients run `ls -la` (or `dir` on Windows) and parse the table.
//! Only plain files and directories are surfaced; symlinks, devices, and
//! relative entries are dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::contracts::types::{FileType, ListFilesItem};

static LINUX_LS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(?P<type>[bcdDlps-])(?:[r-][w-][sStTx-]){3}\s+\d+\s+\S+\s+\S+\s+(?P<size>\d+(?:, \d+)?)\s+\w+\s+\d+\s+(?:\d{4}|\d{1,2}:\d{2})\s+(?P<name>.*)$",
    )
    .unwrap()
});

static WINDOWS_DIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\d{1,2}[/.]\d{1,2}[/.]\d{4}\s+\d{1,2}:\d{1,2}(?: (?:AM|PM))?\s+(?P<type><DIR>|<SYMLINKD>|\d+)\s+(?P<name>.*)$",
    )
    .unwrap()
});

fn posix_join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

fn windows_join(base: &str, name: &str) -> String {
    if base.ends_with('\\') || base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}\\{name}")
    }
}

pub fn parse_linux_listing(base_path: &str, output: &str) -> Vec<ListFilesItem> {
    let mut items = Vec::new();
    for captures in LINUX_LS_RE.captures_iter(output) {
        let name = captures["name"].trim_end();
        let file_type = match &captures["type"] {
            "d" => FileType::Directory,
            "-" => FileType::File,
            _ => continue,
        };
        if file_type == FileType::Directory && (name == "." || name == "..") {
            continue;
        }
        items.push(ListFilesItem {
            name: name.to_string(),
            path: posix_join(base_path, name),
            size: captures["size"].parse().ok(),
            file_type,
            mode: None,
            uid: None,
            gid: None,
            ctime: None,
            mtime: None,
            atime: None,
        });
    }
    items
}

pub fn parse_windows_listing(base_path: &str, output: &str) -> Vec<ListFilesItem> {
    let mut items = Vec::new();
    for captures in WINDOWS_DIR_RE.captures_iter(output) {
        let name = captures["name"].trim_end();
        // the type column doubles as the size column for plain files
        let (file_type, size) = match &captures["type"] {
            "<DIR>" => (FileType::Directory, None),
            "<SYMLINKD>" => continue,
            digits => match digits.parse::<u64>() {
                Ok(size) => (FileType::File, Some(size)),
                Err(_) => continue,
            },
        };
        if file_type == FileType::Directory && (name == "." || name == "..") {
            continue;
        }
        items.push(ListFilesItem {
            name: name.to_string(),
            path: windows_join(base_path, name),
            size,
            file_type,
            mode: None,
            uid: None,
            gid: None,
            ctime: None,
            mtime: None,
            atime: None,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_listing() {
        let output = "\
total 12
drwxr-xr-x    2 root     root          4096 Apr 10 12:00 .
drwxr-xr-x    1 root     root          4096 Apr 10 12:00 ..
drwxr-xr-x    2 root     root          4096 Apr 10 12:00 conf.d
-rw-r--r--    1 root     root           642 Apr 10  2023 nginx.conf
lrwxrwxrwx    1 root     root            11 Apr 10 12:00 link -> target
";
        let items = parse_linux_listing("/etc/nginx", output);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "conf.d");
        assert_eq!(items[0].file_type, FileType::Directory);
        assert_eq!(items[1].path, "/etc/nginx/nginx.conf");
        assert_eq!(items[1].size, Some(642));
    }

    #[test]
    fn windows_listing() {
        let output = "\
 Directory of C:\\app

04/10/2023  12:00 PM    <DIR>          .
04/10/2023  12:00 PM    <DIR>          logs
04/10/2023  12:01 PM              1024 app.exe
";
        let items = parse_windows_listing("C:\\app", output);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "logs");
        assert_eq!(items[1].path, "C:\\app\\app.exe");
        assert_eq!(items[1].size, Some(1024));
    }
}
