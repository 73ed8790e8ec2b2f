/*!
 * Trace Replay Tests
 * Decoded JSON syscalls executed end to end
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use sysmem_kernel::{
    BufferConsole, ErrorCode, MemoryManager, SysMemConfig, Syscall, SyscallExecutor,
    SyscallResult,
};

fn replay(exec: &SyscallExecutor, trace: &str) -> Vec<SyscallResult> {
    trace
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let syscall: Syscall = serde_json::from_str(line).expect("valid trace line");
            exec.execute(&syscall)
        })
        .collect()
}

fn block_id(result: &SyscallResult) -> i32 {
    match result {
        SyscallResult::Code { code, .. } => *code,
        other => panic!("expected a code, got {:?}", other),
    }
}

#[test]
fn test_replay_partition_trace() {
    let exec = SyscallExecutor::new(
        MemoryManager::with_config(SysMemConfig::single(0, 1000, 1)).unwrap(),
    );
    let results = replay(
        &exec,
        r#"
        {"op":"alloc_partition_memory","partition":2,"name":"a","placement":0,"size":300}
        {"op":"alloc_partition_memory","partition":2,"name":"b","placement":1,"size":300}
        {"op":"total_free_mem_size"}
        {"op":"max_free_mem_size"}
        {"op":"alloc_partition_memory","partition":2,"name":"c","placement":2,"size":100,"address":100}
        {"op":"alloc_partition_memory","partition":2,"name":"d","placement":2,"size":100,"address":100}
        "#,
    );

    let a = block_id(&results[0]);
    let b = block_id(&results[1]);
    assert!(a > 0 && b > 0);
    assert_eq!(results[2], SyscallResult::value(400));
    assert_eq!(results[3], SyscallResult::value(400));
    assert_eq!(
        results[5],
        SyscallResult::Code {
            code: ErrorCode::AddressUnavailable.raw(),
            error: Some(ErrorCode::AddressUnavailable),
        }
    );

    let head = exec.execute(&Syscall::GetBlockHeadAddr { block: b });
    assert_eq!(head, SyscallResult::value(700));
}

#[test]
fn test_replay_memory_block_trace() {
    let exec = SyscallExecutor::new(MemoryManager::new());
    let results = replay(
        &exec,
        r#"
        {"op":"alloc_memory_block","name":"heap","placement":0,"size":4096,"opt_size":4}
        {"op":"alloc_memory_block","placement":0,"size":4096}
        {"op":"alloc_memory_block","name":"x","placement":0,"size":16,"opt_size":12}
        "#,
    );

    let heap = block_id(&results[0]);
    assert!(heap > 0);
    assert_eq!(results[1], SyscallResult::code(ErrorCode::InvalidArgument.raw()));
    assert_eq!(results[2], SyscallResult::code(ErrorCode::InvalidArgument.raw()));

    assert_eq!(
        exec.execute(&Syscall::GetMemoryBlockAddr { block: heap }),
        SyscallResult::Address {
            code: 0,
            address: Some(0x0880_0000),
        }
    );
    assert_eq!(
        exec.execute(&Syscall::FreeMemoryBlock { block: heap }),
        SyscallResult::code(0)
    );
    assert_eq!(
        exec.execute(&Syscall::GetMemoryBlockAddr { block: heap }),
        SyscallResult::Address {
            code: ErrorCode::UnknownBlock.raw(),
            address: None,
        }
    );
}

#[test]
fn test_replay_system_and_introspection() {
    let console = Arc::new(BufferConsole::new());
    let exec = SyscallExecutor::new(MemoryManager::new()).with_console(console.clone());

    let results = replay(
        &exec,
        r#"
        {"op":"set_compiled_sdk_version","version":100663312}
        {"op":"get_compiled_sdk_version"}
        {"op":"devkit_version"}
        {"op":"kernel_printf","message":"hello from the trace"}
        {"op":"query_partitions"}
        "#,
    );
    assert_eq!(results[0], SyscallResult::code(0));
    assert_eq!(results[1], SyscallResult::value(0x0600_0010));
    assert_eq!(results[2], SyscallResult::value(0x0606_0010));
    assert_eq!(results[3], SyscallResult::Done);
    assert_eq!(console.lines(), vec!["hello from the trace".to_string()]);

    match &results[4] {
        SyscallResult::Partitions { partitions } => {
            let ids: Vec<u32> = partitions.iter().map(|p| p.id.0).collect();
            assert_eq!(ids, vec![1, 2, 5]);
        }
        other => panic!("expected partitions, got {:?}", other),
    }

    let id = exec.alloc_partition_memory(2, "scratch", 1, 64, 0);
    match exec.execute(&Syscall::QueryBlock { block: id }) {
        SyscallResult::Block { block } => {
            assert_eq!(block.name.as_str(), "scratch");
            assert_eq!(block.size, 256);
        }
        other => panic!("expected block info, got {:?}", other),
    }

    match exec.execute(&Syscall::Snapshot) {
        SyscallResult::Snapshot { snapshot } => {
            assert_eq!(snapshot.blocks.len(), 1);
            assert_eq!(snapshot.compiled_sdk_version, 0x0600_0010);
        }
        other => panic!("expected snapshot, got {:?}", other),
    }
}

#[test]
fn test_results_serialize_as_tagged_json() {
    let exec = SyscallExecutor::new(MemoryManager::new());
    let result = exec.execute(&Syscall::FreePartitionMemory { block: 99 });
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({ "status": "code", "code": -4, "error": "unknown_block" })
    );
}
