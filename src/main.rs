/*!
 * Sysmem Replay - Main Entry Point
 *
 * Replays a JSON-lines syscall trace against one memory manager:
 * - one `Syscall` per input line on stdin
 * - one `SyscallResult` per line on stdout
 * - diagnostics on stderr
 */

use miette::{IntoDiagnostic, Result, WrapErr};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use sysmem_kernel::monitoring::span_replay;
use sysmem_kernel::{init_tracing, MemoryManager, SysMemConfig, Syscall, SyscallExecutor, SyscallResult};

fn main() -> Result<()> {
    init_tracing();

    let config = SysMemConfig::from_env().wrap_err("failed to load partition layout")?;
    info!(
        partitions = config.partitions.len(),
        granularity = config.granularity,
        firmware = %format_args!("0x{:08x}", config.firmware_version),
        "Sysmem replay starting"
    );
    let memory = MemoryManager::with_config(config)?;
    let executor = SyscallExecutor::new(memory);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut replayed = 0usize;

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.into_diagnostic().wrap_err("failed to read trace")?;
        if line.trim().is_empty() {
            continue;
        }

        let span = span_replay(index + 1);
        let _guard = span.enter();

        let result = match serde_json::from_str::<Syscall>(&line) {
            Ok(syscall) => {
                replayed += 1;
                executor.execute(&syscall)
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed trace line");
                SyscallResult::error(e.to_string())
            }
        };

        serde_json::to_writer(&mut stdout, &result).into_diagnostic()?;
        stdout.write_all(b"\n").into_diagnostic()?;
    }
    stdout.flush().into_diagnostic()?;

    info!(replayed, live_blocks = executor.memory().live_count(), "Replay finished");
    Ok(())
}
