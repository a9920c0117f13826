use crate::core::cmd::run_cmd_timeout_async;
use memchr::{memchr, memmem};

const DUMPSYS_TIMEOUT_MS: u64 = 1000;

/// Package owning the currently focused top-level task, if one can be found.
pub async fn get_foreground_package() -> anyhow::Result<Option<String>> {
    let out = match run_cmd_timeout_async(
        "/system/bin/dumpsys",
        &["activity", "activities"],
        DUMPSYS_TIMEOUT_MS,
    )
    .await
    {
        Ok(o) => o,
        Err(e) => {
            tracing::debug!(target: "gamespace::source", "dumpsys activity failed: {:?}", e);
            return Ok(None);
        }
    };

    Ok(parse_foreground(&out.stdout))
}

pub(crate) fn parse_foreground(data: &[u8]) -> Option<String> {
    let resumed_finder = memmem::Finder::new(b"ResumedActivity");

    let mut pos = 0;
    while pos < data.len() {
        let Some(offset) = resumed_finder.find(&data[pos..]) else {
            break;
        };
        pos += offset;

        let line_start = data[..pos]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |p| p + 1);
        let line_end = memchr(b'\n', &data[pos..]).map_or(data.len(), |p| pos + p);

        if let Some(pkg) = extract_package(&data[line_start..line_end]) {
            return Some(pkg);
        }
        pos = line_end + 1;
    }
    None
}

fn extract_package(line: &[u8]) -> Option<String> {
    let user_pos = memmem::find(line, b" u0 ")? + 4;
    let rest = &line[user_pos..];
    let slash_pos = memchr(b'/', rest)?;
    let pkg_bytes = &rest[..slash_pos];
    if memchr(b'.', pkg_bytes).is_some() {
        Some(String::from_utf8_lossy(pkg_bytes).trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_resumed_activity_package() {
        let dump = b"ACTIVITY MANAGER ACTIVITIES (dumpsys activity activities)
Display #0 (activities from top to bottom):
  * Task{4c1e0f5 #312 type=standard A=10245:com.mobile.legends U=0 visible=true}
    mResumedActivity: ActivityRecord{8f7a2e1 u0 com.mobile.legends/com.moba.unityplugin.MainActivity t312}
  ResumedActivity: ActivityRecord{8f7a2e1 u0 com.mobile.legends/com.moba.unityplugin.MainActivity t312}
";
        assert_eq!(parse_foreground(dump).as_deref(), Some("com.mobile.legends"));
    }

    #[test]
    fn skips_lines_without_a_package() {
        let dump = b"  mResumedActivity: null
  ResumedActivity: ActivityRecord{1 u0 com.android.launcher3/.uioverrides.QuickstepLauncher t2}
";
        assert_eq!(
            parse_foreground(dump).as_deref(),
            Some("com.android.launcher3")
        );
    }

    #[test]
    fn no_resumed_activity_is_none() {
        assert_eq!(parse_foreground(b"Display #0\n  (nothing)\n"), None);
        assert_eq!(parse_foreground(b""), None);
    }
}
