/*!
 * System Syscall Tests
 * Version accessors, free-size queries and debug printf
 */

use std::sync::Arc;
use sysmem_kernel::{
    kernel_printf, BufferConsole, MemoryError, MemoryManager, SysMemConfig, SyscallExecutor,
};

#[test]
fn test_free_size_queries() {
    let exec = SyscallExecutor::new(
        MemoryManager::with_config(SysMemConfig::single(0, 1000, 1)).unwrap(),
    );
    assert_eq!(exec.total_free_mem_size(), 1000);
    assert_eq!(exec.max_free_mem_size(), 1000);

    exec.alloc_partition_memory(2, "mid", 2, 100, 450);
    assert_eq!(exec.total_free_mem_size(), 900);
    assert_eq!(exec.max_free_mem_size(), 450);
}

#[test]
fn test_versions() {
    let exec = SyscallExecutor::new(MemoryManager::new());
    assert_eq!(exec.devkit_version(), 0x0606_0010);
    assert_eq!(exec.get_compiled_sdk_version(), 0);

    assert_eq!(exec.set_compiled_sdk_version(0x0371_0010), 0);
    assert_eq!(exec.get_compiled_sdk_version(), 0x0371_0010);

    // Clones share the manager state
    let clone = exec.clone();
    clone.set_compiled_sdk_version(0x0500_0010);
    assert_eq!(exec.get_compiled_sdk_version(), 0x0500_0010);
}

#[test]
fn test_printf_to_buffer() {
    let console = Arc::new(BufferConsole::new());
    let exec = SyscallExecutor::new(MemoryManager::new()).with_console(console.clone());

    kernel_printf!(exec, "free={}", exec.total_free_mem_size()).unwrap();
    kernel_printf!(exec, "sdk=0x{:08x}", exec.get_compiled_sdk_version()).unwrap();

    assert_eq!(
        console.lines(),
        vec![format!("free={}", 24 * 1024 * 1024), "sdk=0x00000000".to_string()]
    );
}

#[test]
fn test_printf_gated_by_firmware() {
    let console = Arc::new(BufferConsole::new());
    let config = SysMemConfig::default().with_firmware(0x0100_0300);
    let exec = SyscallExecutor::new(MemoryManager::with_config(config).unwrap())
        .with_console(console.clone());

    let result = kernel_printf!(exec, "too early");
    assert!(matches!(result, Err(MemoryError::Unsupported { .. })));
    assert!(console.lines().is_empty());
}
