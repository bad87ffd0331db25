use rbfixture::{HeapBuilder, fixnum, flonum, static_symbol_word};
use rbvalue::layout::abi;
use rbvalue::{Classification, HeapKind, Immediate, Session, classify};

fn classify_word(heap: &HeapBuilder, word: u64) -> Classification {
    let mut session = Session::new(heap, false);
    classify(&mut session, word).unwrap()
}

#[test]
fn immediates_classify_without_memory_reads() {
    let heap = HeapBuilder::new();
    for word in [
        abi::Q_FALSE,
        abi::Q_NIL,
        abi::Q_TRUE,
        abi::Q_UNDEF,
        fixnum(42),
        fixnum(-7),
        flonum(1.0),
        static_symbol_word(3),
    ] {
        assert!(classify_word(&heap, word).is_immediate());
    }
    assert_eq!(heap.reads(), 0);
}

#[test]
fn sentinel_words() {
    let heap = HeapBuilder::new();
    assert_eq!(
        classify_word(&heap, abi::Q_FALSE),
        Classification::Immediate(Immediate::False)
    );
    assert_eq!(
        classify_word(&heap, abi::Q_NIL),
        Classification::Immediate(Immediate::Nil)
    );
    assert_eq!(
        classify_word(&heap, abi::Q_TRUE),
        Classification::Immediate(Immediate::True)
    );
    assert_eq!(
        classify_word(&heap, abi::Q_UNDEF),
        Classification::Immediate(Immediate::Undef)
    );
}

#[test]
fn fixnum_values() {
    let heap = HeapBuilder::new();
    assert_eq!(
        classify_word(&heap, fixnum(42)),
        Classification::Immediate(Immediate::Fixnum(42))
    );
    assert_eq!(
        classify_word(&heap, fixnum(-1)),
        Classification::Immediate(Immediate::Fixnum(-1))
    );
    assert_eq!(
        classify_word(&heap, fixnum(0)),
        Classification::Immediate(Immediate::Fixnum(0))
    );
}

#[test]
fn flonum_values() {
    let heap = HeapBuilder::new();
    for value in [0.0, 1.0, -1.5, 3.14] {
        assert_eq!(
            classify_word(&heap, flonum(value)),
            Classification::Immediate(Immediate::Flonum(value))
        );
    }
}

#[test]
fn static_symbol_id() {
    let heap = HeapBuilder::new();
    assert_eq!(
        classify_word(&heap, static_symbol_word(77)),
        Classification::Immediate(Immediate::StaticSymbol(77))
    );
}

#[test]
fn heap_kinds_resolve_from_header_tags() {
    let mut heap = HeapBuilder::new();
    let string = heap.string("x");
    let array = heap.array(&[fixnum(1)]);
    let hash = heap.hash(&[(fixnum(1), fixnum(2))]);
    let float = heap.float(2.5);
    for (word, kind) in [
        (string, HeapKind::String),
        (array, HeapKind::Array),
        (hash, HeapKind::Hash),
        (float, HeapKind::Float),
    ] {
        match classify_word(&heap, word) {
            Classification::Heap { kind: found, address, .. } => {
                assert_eq!(found, kind);
                assert_eq!(address, word);
            }
            other => panic!("expected heap classification, got {other:?}"),
        }
    }
}

#[test]
fn unreadable_header_is_a_classification() {
    let heap = HeapBuilder::new();
    let unmapped = heap.end() + 0x100;
    assert_eq!(
        classify_word(&heap, unmapped),
        Classification::Unreadable { address: unmapped }
    );
}

#[test]
fn out_of_set_tag_is_a_classification() {
    let mut heap = HeapBuilder::new();
    let strange = heap.opaque(0x17);
    assert_eq!(
        classify_word(&heap, strange),
        Classification::UnknownTag {
            address: strange,
            tag: 0x17
        }
    );
}

#[test]
fn missing_tag_mask_aborts() {
    let mut heap = HeapBuilder::new();
    let string = heap.string("x");
    heap.remove_constant("RUBY_T_MASK");
    let mut session = Session::new(&heap, false);
    let error = classify(&mut session, string).unwrap_err();
    assert!(error.is_missing_constant());
}
