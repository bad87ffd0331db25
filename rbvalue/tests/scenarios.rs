//! Line-exact rendering scenarios.

use rbfixture::{HeapBuilder, fixnum};
use rbvalue::layout::abi;
use rbvalue::{InspectOptions, inspect_word};

fn options(depth: u32) -> InspectOptions {
    InspectOptions {
        depth,
        trace: false,
    }
}

fn render(heap: &HeapBuilder, word: u64, depth: u32) -> String {
    inspect_word(heap, word, &options(depth)).unwrap().text
}

#[test]
fn boolean_false_renders_bare_tag() {
    let heap = HeapBuilder::new();
    assert_eq!(render(&heap, abi::Q_FALSE, 1), "<T_FALSE>");
}

#[test]
fn small_integer_renders_value() {
    let heap = HeapBuilder::new();
    assert_eq!(render(&heap, fixnum(42), 1), "<T_FIXNUM> 42");
}

#[test]
fn compact_hash_with_symbol_keys_at_depth_one() {
    let mut heap = HeapBuilder::new();
    let name = heap.symbol("name");
    let age = heap.symbol("age");
    let active = heap.symbol("active");
    let alice = heap.string("Alice");
    let hash = heap.hash_compact(&[
        (name, alice),
        (age, fixnum(30)),
        (active, abi::Q_TRUE),
    ]);

    let expected = format!(
        "<T_HASH@0x{hash:x}>\n\
         \x20 [ 0] K: <T_SYMBOL@0x{name:x}> :name\n\
         \x20      V: <T_STRING@0x{alice:x}> \"Alice\"\n\
         \x20 [ 1] K: <T_SYMBOL@0x{age:x}> :age\n\
         \x20      V: <T_FIXNUM> 30\n\
         \x20 [ 2] K: <T_SYMBOL@0x{active:x}> :active\n\
         \x20      V: <T_TRUE>"
    );
    assert_eq!(render(&heap, hash, 1), expected);
}

#[test]
fn nested_hash_expands_only_with_budget() {
    let mut heap = HeapBuilder::new();
    let name = heap.symbol("name");
    let alice = heap.string("Alice");
    let inner = heap.hash_compact(&[(name, alice)]);
    let profile = heap.symbol("profile");
    let outer = heap.hash_compact(&[(profile, inner)]);

    // Depth 1: the nested hash is only its header line.
    let shallow = render(&heap, outer, 1);
    let expected_shallow = format!(
        "<T_HASH@0x{outer:x}>\n\
         \x20 [ 0] K: <T_SYMBOL@0x{profile:x}> :profile\n\
         \x20      V: <T_HASH@0x{inner:x}>"
    );
    assert_eq!(shallow, expected_shallow);

    // Depth 2: the inner entries appear, one level deeper.
    let deep = render(&heap, outer, 2);
    let expected_deep = format!(
        "<T_HASH@0x{outer:x}>\n\
         \x20 [ 0] K: <T_SYMBOL@0x{profile:x}> :profile\n\
         \x20      V: <T_HASH@0x{inner:x}>\n\
         \x20   [ 0] K: <T_SYMBOL@0x{name:x}> :name\n\
         \x20        V: <T_STRING@0x{alice:x}> \"Alice\""
    );
    assert_eq!(deep, expected_deep);
}

#[test]
fn struct_members_are_positional() {
    let mut heap = HeapBuilder::new();
    let john = heap.string("John");
    let engineer = heap.string("Engineer");
    let record = heap.struct_value(&[john, fixnum(25), engineer, abi::Q_TRUE]);

    let expected = format!(
        "<T_STRUCT@0x{record:x}>\n\
         \x20 [ 0] <T_STRING@0x{john:x}> \"John\"\n\
         \x20 [ 1] <T_FIXNUM> 25\n\
         \x20 [ 2] <T_STRING@0x{engineer:x}> \"Engineer\"\n\
         \x20 [ 3] <T_TRUE>"
    );
    assert_eq!(render(&heap, record, 1), expected);
}
