//! End-to-end scenarios: assemble real sources, run them, check the
//! observable outcome (output buffers, instruction and tick counts).

use accum_asm::translate;
use accum_machine::{Outcome, simulate};

const CAPACITY: usize = 300;
const BOUND: u64 = 5000;

fn run(source: &str, input: &str) -> Outcome {
    let image = translate(source).expect("scenario source must assemble");
    simulate(&image, input, CAPACITY, BOUND).expect("scenario image must load")
}

#[test]
fn hello_cell() {
    let source = "\
org 10
_start: LD msg
        OUT port_sym
        HLT
msg:    .word 72
port_sym: .word 0
";
    let outcome = run(source, "");
    assert_eq!(outcome.symbols, "H");
    assert!(outcome.numbers.is_empty());
    // JMP, LD, OUT, HLT.
    assert_eq!(outcome.instructions, 4);
    // 3 + 4 + 3 + 2 ticks.
    assert_eq!(outcome.ticks, 12);
}

#[test]
fn echo_one() {
    let source = "\
org 10
_start: IN
        OUT p
        HLT
p:      .word 0
";
    let outcome = run(source, "A");
    assert_eq!(outcome.symbols, "A");
    assert!(outcome.numbers.is_empty());
}

#[test]
fn echo_empty_input_emits_nul() {
    let source = "\
org 10
_start: IN
        OUT p
        HLT
p:      .word 0
";
    // Exhausted input loads 0 into AC; the symbol port then appends
    // chr(0), so the NUL lands in the buffer.
    let outcome = run(source, "");
    assert_eq!(outcome.symbols, "\0");
}

#[test]
fn countdown_loop_takes_jnz_twice() {
    let source = "\
org 10
_start: LD n
loop:   DEC
        JNZ loop
        OUT p
        HLT
n:      .word 3
p:      .word 1
";
    let outcome = run(source, "");
    assert_eq!(outcome.numbers, vec![0], "AC reached zero");
    // JMP, LD, then DEC/JNZ three times (taken, taken, untaken),
    // then OUT and HLT.
    assert_eq!(outcome.instructions, 10);
    // Fetches: 10 * 2. Executes: JMP 1, LD 2, DEC 1 each, JNZ 1 when
    // taken and 0 when it falls through, OUT 1, HLT 0.
    assert_eq!(outcome.ticks, 20 + 1 + 2 + 3 + 2 + 1);
}

#[test]
fn indirection_chases_the_pointer() {
    let source = "\
org 10
_start: LD (ptr)
        OUT p
        HLT
ptr:    .word target
target: .word 99
p:      .word 1
";
    let outcome = run(source, "");
    assert_eq!(outcome.numbers, vec![99]);
}

#[test]
fn stack_round_trip() {
    let source = "\
org 10
_start: LD v
        PUSH
        LD zero
        POP
        OUT p
        HLT
v:      .word 7
zero:   .word 0
p:      .word 1
";
    let outcome = run(source, "");
    assert_eq!(outcome.numbers, vec![7]);
    assert!(outcome.symbols.is_empty());
}

#[test]
fn pascal_string_walk() {
    // Walk the characters of a pascal string through the symbol port with
    // an indirect load and a moving pointer. The string lands at address
    // 23 (length cell), so its first character sits at 24.
    let source = "\
org 10
_start: LD (cursor)
        OUT psym
        LD cursor
        INC
        ST cursor
        LD counter
        DEC
        ST counter
        JNZ _start
        HLT
cursor: .word 24
counter: .word 3
psym:   .word 0
text:   .word 3, 'abc'
";
    let outcome = run(source, "");
    assert_eq!(outcome.symbols, "abc");
}

#[test]
fn budget_exhaustion_returns_partial_state() {
    let source = "\
org 10
_start: INC
        JMP _start
";
    let image = translate(source).unwrap();
    let outcome = simulate(&image, "", CAPACITY, 50).unwrap();
    assert_eq!(outcome.instructions, 50);
    assert!(outcome.ticks > 50);
}
