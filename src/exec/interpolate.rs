// src/exec/interpolate.rs

//! `%f` substitution into the command template.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, RunwatchError};
use crate::types::{CommandTemplate, PATH_PLACEHOLDER, ResolvedCommand};

/// Resolve `template` for a change at `trigger`.
///
/// Every argument containing `%f` has each occurrence replaced by `trigger`
/// and the result is turned into an absolute, lexically cleaned path.
/// Arguments without the placeholder and the executable itself are copied
/// verbatim. The trigger path is spliced in as an OS string, so its bytes
/// are never re-encoded.
pub fn interpolate(template: &CommandTemplate, trigger: &Path) -> Result<ResolvedCommand> {
    let argv = template
        .argv
        .iter()
        .map(|arg| {
            if arg.contains(PATH_PLACEHOLDER) {
                let substituted = substitute(arg, trigger);
                absolute_clean(Path::new(&substituted)).map(PathBuf::into_os_string)
            } else {
                Ok(OsString::from(arg))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedCommand {
        executable: template.executable.clone(),
        argv,
    })
}

fn substitute(arg: &str, trigger: &Path) -> OsString {
    let mut out = OsString::with_capacity(arg.len() + trigger.as_os_str().len());
    for (i, piece) in arg.split(PATH_PLACEHOLDER).enumerate() {
        if i > 0 {
            out.push(trigger);
        }
        out.push(piece);
    }
    out
}

/// Make `path` absolute against the working directory and drop `.`/`..`
/// components without touching the filesystem.
fn absolute_clean(path: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(path).map_err(|source| RunwatchError::PathResolution {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(s: &str) -> CommandTemplate {
        s.parse().unwrap()
    }

    #[test]
    fn placeholder_is_replaced_with_trigger_path() {
        let t = template("echo hello %f");
        let cmd = interpolate(&t, Path::new("/tmp/x.txt")).unwrap();
        assert_eq!(cmd.executable, "echo");
        assert_eq!(cmd.argv, vec!["hello", "/tmp/x.txt"]);
    }

    #[test]
    fn arguments_without_placeholder_pass_through() {
        let t = template("grep -n ./relative/../TODO %f");
        let cmd = interpolate(&t, Path::new("/src/lib.rs")).unwrap();
        assert_eq!(cmd.argv, vec!["-n", "./relative/../TODO", "/src/lib.rs"]);
    }

    #[test]
    fn executable_is_never_interpolated() {
        let t = template("%f --check");
        let cmd = interpolate(&t, Path::new("/a/b")).unwrap();
        assert_eq!(cmd.executable, "%f");
        assert_eq!(cmd.argv, vec!["--check"]);
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let t = template("cp %f %f.bak");
        let cmd = interpolate(&t, Path::new("/data/a.txt")).unwrap();
        assert_eq!(cmd.argv, vec!["/data/a.txt", "/data/a.txt.bak"]);
    }

    #[test]
    fn relative_trigger_is_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let t = template("cat %f");
        let cmd = interpolate(&t, Path::new("sub/./dir/../file.txt")).unwrap();
        assert_eq!(
            PathBuf::from(&cmd.argv[0]),
            cwd.join("sub").join("file.txt")
        );
    }

    #[test]
    fn parent_components_are_cleaned() {
        let t = template("cat %f");
        let cmd = interpolate(&t, Path::new("/a/b/../c/./d")).unwrap();
        assert_eq!(cmd.argv, vec!["/a/c/d"]);

        let cmd = interpolate(&t, Path::new("/../../x")).unwrap();
        assert_eq!(cmd.argv, vec!["/x"]);
    }

    #[test]
    fn empty_template_argv_is_fine() {
        let t = template("make");
        let cmd = interpolate(&t, Path::new("/whatever")).unwrap();
        assert!(cmd.argv.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_trigger_is_passed_through_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let trigger = Path::new(OsStr::from_bytes(b"/tmp/caf\xe9.txt"));
        let cmd = interpolate(&template("cat %f %f.bak"), trigger).unwrap();
        assert_eq!(cmd.argv[0].as_bytes(), b"/tmp/caf\xe9.txt");
        assert_eq!(cmd.argv[1].as_bytes(), b"/tmp/caf\xe9.txt.bak");
    }

    #[test]
    fn empty_substitution_is_a_path_resolution_error() {
        let t = template("cat %f");
        let err = interpolate(&t, Path::new("")).unwrap_err();
        assert!(matches!(err, RunwatchError::PathResolution { .. }));
    }
}
