//! Sample Memcheck logs used by the integration tests

pub struct TestFixtures;

impl TestFixtures {
    /// A Memcheck run with one invalid read and three leak records
    pub fn sample_log() -> &'static str {
        "\
==12345== Memcheck, a memory error detector
==12345== Copyright (C) 2002-2022, and GNU GPL'd, by Julian Seward et al.
==12345== Using Valgrind-3.19.0 and LibVEX; rerun with -h for copyright info
==12345== Command: ./demo
==12345==
==12345== Invalid read of size 4
==12345==    at 0x4005A1: read_past_end (demo.c:42)
==12345==    by 0x4005F2: main (demo.c:77)
==12345==  Address 0x5204050 is 0 bytes after a block of size 16 alloc'd
==12345==
==12345== HEAP SUMMARY:
==12345==     in use at exit: 1,184 bytes in 4 blocks
==12345==
==12345== 64 bytes in 1 blocks are still reachable in loss record 1 of 3
==12345==    at 0x4C2FB0F: malloc (in /usr/lib/valgrind/vgpreload_memcheck-amd64-linux.so)
==12345==    by 0x400537: keep_alive (demo.c:12)
==12345==
==12345== 96 (64 direct, 32 indirect) bytes in 2 blocks are possibly lost in loss record 2 of 3
==12345==    at 0x4C2FB0F: malloc (in /usr/lib/valgrind/vgpreload_memcheck-amd64-linux.so)
==12345==    by 0x4005B8: make_node (demo.c:21)
==12345==    by 0x4005F2: main (demo.c:77)
==12345==
==12345== 1,024 bytes in 1 blocks are definitely lost in loss record 3 of 3
==12345==    at 0x4C2FB0F: malloc (in /usr/lib/valgrind/vgpreload_memcheck-amd64-linux.so)
==12345==    by 0x4005D1: leak_buffer (demo.c:33)
==12345==    by 0x4005F2: main (demo.c:77)
==12345==
==12345== LEAK SUMMARY:
==12345==    definitely lost: 1,024 bytes in 1 blocks
==12345==    possibly lost: 96 bytes in 2 blocks
==12345==    still reachable: 64 bytes in 1 blocks
==12345== ERROR SUMMARY: 2 errors from 2 contexts (suppressed: 0 from 0)
"
    }

    /// A clean run: valid banner, no issues
    pub fn clean_log() -> &'static str {
        "\
==777== Memcheck, a memory error detector
==777== Command: ./ok
==777==
==777== HEAP SUMMARY:
==777==     in use at exit: 0 bytes in 0 blocks
==777== All heap blocks were freed -- no leaks are possible
==777== ERROR SUMMARY: 0 errors from 0 contexts (suppressed: 0 from 0)
"
    }

    /// Output of some other tool: no Memcheck banner anywhere
    pub fn foreign_log() -> &'static str {
        "\
[2024-01-01 10:00:00] service starting
[2024-01-01 10:00:01] listening on :8080
==123== 48 bytes in 2 blocks are definitely lost in loss record 5 of 10
"
    }
}
