// src/exec/command.rs

use std::process::Stdio;

use tokio::process::Command;

use crate::config::CommandSpec;

/// Build the OS command for `spec`.
///
/// - stdout/stderr are inherited, so the program writes straight to our
///   terminal; stdin is closed.
/// - On Unix the program becomes the leader of a new process group, so the
///   whole tree it spawns (e.g. the binary `go run` builds) can be signalled
///   at once.
pub fn build_command(spec: &CommandSpec) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}
