//! Restore-script synthesis.
//!
//! The restore procedure is an executable `sh` script generated at backup
//! time. The procedure logic is a fixed template; the identity, the
//! captured settings document, the engine endpoint and the restart command
//! are spliced in as data. Every value except the restart command (which is
//! a shell command by contract and runs verbatim) is embedded as a
//! single-quoted shell literal, with the settings document serialized to one
//! escaped JSON blob rather than interpolated field by field. Nothing in
//! the script queries the original source engine; restore-time behavior
//! depends only on values frozen here.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use logvault_core::{IndexIdentity, Result, SettingsDocument};
use tracing::debug;

/// Quote a value as a single shell word.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Render the restore procedure for one captured index.
///
/// The generated script:
/// 1. aborts if the target engine already holds an index of this name
///    (a `_status` response without an error indicator means "exists");
/// 2. creates the index with the embedded settings and mapping;
/// 3. extracts the archive sitting next to the script at the index root,
///    failing with a message if the archive is absent;
/// 4. runs the restart command so the engine picks up the new segment files.
pub fn render(
    identity: &IndexIdentity,
    settings: &SettingsDocument,
    engine_url: &str,
    data_dir: &Path,
    restart_cmd: &str,
) -> Result<String> {
    let create_body = serde_json::to_string(&settings.create_index_body())?;

    Ok(format!(
        r#"#!/bin/sh
# Restore procedure for {name}, generated at backup time.
# All values below were captured from the source; nothing is fetched again.
set -u

INDEX_NAME={q_name}
ENGINE_URL={q_engine}
INDEX_ROOT={q_root}
ARCHIVE={q_archive}
CREATE_BODY={q_body}

status=$(curl -s "$ENGINE_URL/$INDEX_NAME/_status")
case "$status" in
*error*)
    ;;
*)
    echo "index $INDEX_NAME already exists on $ENGINE_URL; refusing to restore" >&2
    exit 1
    ;;
esac

curl -s -f -X PUT "$ENGINE_URL/$INDEX_NAME/" -d "$CREATE_BODY" >/dev/null || {{
    echo "failed to create index $INDEX_NAME on $ENGINE_URL" >&2
    exit 1
}}

cd "$(dirname "$0")"
if [ ! -f "$ARCHIVE" ]; then
    echo "archive $ARCHIVE not found next to restore script" >&2
    exit 1
fi
tar xzf "$ARCHIVE" -C "$INDEX_ROOT"

{restart_cmd}
"#,
        name = identity.name,
        q_name = shell_quote(&identity.name),
        q_engine = shell_quote(engine_url.trim_end_matches('/')),
        q_root = shell_quote(&data_dir.to_string_lossy()),
        q_archive = shell_quote(&identity.archive_file_name()),
        q_body = shell_quote(&create_body),
        restart_cmd = restart_cmd,
    ))
}

/// Render the script and write it, executable, into the temp directory.
pub fn write(
    identity: &IndexIdentity,
    settings: &SettingsDocument,
    engine_url: &str,
    data_dir: &Path,
    restart_cmd: &str,
    temp_dir: &Path,
) -> Result<PathBuf> {
    let path = temp_dir.join(identity.script_file_name());
    let contents = render(identity, settings, engine_url, data_dir, restart_cmd)?;

    std::fs::write(&path, contents)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

    debug!("restore script written: {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> (IndexIdentity, SettingsDocument) {
        let identity = IndexIdentity::resolve(Some("2013.07.01")).unwrap();
        let settings = SettingsDocument::new(5, 0, json!({"a": "text"}));
        (identity, settings)
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("it's"), r#"'it'\''s'"#);
    }

    #[test]
    fn test_rendered_script_embeds_frozen_values() {
        let (identity, settings) = sample();
        let script = render(
            &identity,
            &settings,
            "http://localhost:9200/",
            Path::new("/var/lib/engine/data"),
            "service engine restart",
        )
        .unwrap();

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("INDEX_NAME='logstash-2013.07.01'"));
        assert!(script.contains("ENGINE_URL='http://localhost:9200'"));
        assert!(script.contains("INDEX_ROOT='/var/lib/engine/data'"));
        assert!(script.contains("ARCHIVE='logstash-2013.07.01.tgz'"));
        assert!(script.contains(r#""number_of_shards":5"#));
        assert!(script.contains(r#""number_of_replicas":0"#));
        assert!(script.contains(r#""mappings":{"a":"text"}"#));
        // The restart command is the last step, after extraction.
        let restart_at = script.find("service engine restart").unwrap();
        let extract_at = script.find("tar xzf").unwrap();
        assert!(restart_at > extract_at);
    }

    #[test]
    fn test_settings_embedded_as_one_quoted_literal() {
        let (identity, _) = sample();
        // A mapping value with an embedded single quote must not break out
        // of the shell literal.
        let settings = SettingsDocument::new(5, 0, json!({"desc": "it's quoted"}));
        let script = render(
            &identity,
            &settings,
            "http://localhost:9200",
            Path::new("/data"),
            "true",
        )
        .unwrap();

        assert!(script.contains(r#"it'\''s quoted"#));
    }

    #[test]
    fn test_written_script_is_executable() {
        let temp = tempfile::tempdir().unwrap();
        let (identity, settings) = sample();
        let path = write(
            &identity,
            &settings,
            "http://localhost:9200",
            Path::new("/data"),
            "true",
            temp.path(),
        )
        .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "logstash-2013.07.01-restore.sh"
        );
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
