//! Budget-bounded traversal over cyclic and heavily shared object graphs.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rbfixture::{HeapBuilder, fixnum};
use rbvalue::{InspectOptions, inspect_word};

fn render(heap: &HeapBuilder, word: u64, depth: u32) -> String {
    let options = InspectOptions {
        depth,
        trace: false,
    };
    inspect_word(heap, word, &options).unwrap().text
}

#[test]
fn self_referential_array_terminates_at_budget() {
    let mut heap = HeapBuilder::new();
    let array = heap.array_placeholder(1);
    heap.patch_array_element(array, 0, array);

    let text = render(&heap, array, 5);
    // Root header plus one element line per budget level, nothing more.
    assert_eq!(text.lines().count(), 6);
    // The innermost occurrence is the same address, unexpanded.
    assert!(text.ends_with(&format!("<T_ARRAY@0x{array:x}>")));
}

#[test]
fn self_referential_hash_terminates_at_budget() {
    let mut heap = HeapBuilder::new();
    let key = heap.symbol("me");
    let hash = heap.hash_compact(&[(key, fixnum(0))]);
    heap.patch_hash_value(hash, 0, hash);

    let text = render(&heap, hash, 4);
    // Each level contributes one K line and one V line below the root.
    assert_eq!(text.lines().count(), 9);
    assert!(text.ends_with(&format!("V: <T_HASH@0x{hash:x}>")));
}

#[test]
fn rendering_is_deterministic() {
    let mut heap = HeapBuilder::new();
    let array = heap.array_placeholder(2);
    heap.patch_array_element(array, 0, array);
    heap.patch_array_element(array, 1, fixnum(3));
    assert_eq!(render(&heap, array, 6), render(&heap, array, 6));
}

#[test]
fn output_is_bounded_by_budget_regardless_of_graph_shape() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x00c0_ffee);
    let mut heap = HeapBuilder::new();

    // A densely shared graph: every new container references earlier ones,
    // so the same addresses are re-expanded many times.
    let mut words: Vec<u64> = vec![fixnum(1), fixnum(2)];
    for _ in 0..30 {
        let pick = |rng: &mut ChaCha8Rng, words: &Vec<u64>| {
            words[rng.random_range(0..words.len())]
        };
        let word = if rng.random_range(0..2) == 0 {
            let elements: Vec<u64> = (0..rng.random_range(1..=4))
                .map(|_| pick(&mut rng, &words))
                .collect();
            heap.array(&elements)
        } else {
            let pairs: Vec<(u64, u64)> = (0..rng.random_range(1..=3))
                .map(|_| (pick(&mut rng, &words), pick(&mut rng, &words)))
                .collect();
            heap.hash(&pairs)
        };
        words.push(word);
    }
    let root = *words.last().unwrap();

    let depth = 4;
    let text = render(&heap, root, depth);
    // At most 8 child lines per node (3 hash entries, two lines each, or 4
    // array elements), through `depth` levels.
    let bound: usize = (0..=depth).map(|level| 8usize.pow(level)).sum();
    assert!(
        text.lines().count() <= bound,
        "render exploded: {} lines for budget {depth}",
        text.lines().count()
    );
}
