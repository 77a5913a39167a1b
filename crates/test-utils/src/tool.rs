//! Executable shell-script stand-ins for the target tool.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write `body` as an executable `/bin/sh` script named `name` inside `dir`.
///
/// The script runs with `dir` as its working directory (the driver starts the
/// tool next to its executable), so it can leave relative breadcrumbs.
#[cfg(unix)]
pub fn write_tool_script(dir: &Path, name: &str, body: &str) -> io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}

/// Interactive tool: records its arguments and every stdin line, answers each
/// line with `ack <line>` on stdout, and exits with `exit_code` on `exit`.
pub fn interactive_body(exit_code: i32) -> String {
    format!(
        r#"echo "$*" > args.txt
: > received.txt
while IFS= read -r line; do
  echo "$line" >> received.txt
  echo "ack $line"
  if [ "$line" = "exit" ]; then
    exit {exit_code}
  fi
done
exit {exit_code}"#
    )
}

/// Individual-mode tool: records each invocation's arguments; fails with
/// status 3 (and a message on stderr) when its first argument is `fail`.
pub fn individual_body() -> &'static str {
    r#"echo "$*" >> invocations.txt
if [ "$1" = "fail" ]; then
  echo "boom: $*" >&2
  exit 3
fi
echo "ok $*""#
}

/// Read a breadcrumb file left by a tool script, or an empty string.
pub fn read_breadcrumb(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_default()
}
