use std::hash::BuildHasher;

use arbitrary::Unstructured;
use arbtest::{arbitrary, arbtest};
use malachite::Natural;
use valseq_sequence::{Error, Sequence};

// Doubling a sequence repeatedly would blow up quickly.
const MAX_SELF_CONCAT_LEN: usize = 4096;

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    Append(Vec<u32>),
    Prepend(Vec<u32>),
    ConcatSelf,
    Update(usize, u32),
    Take(usize),
    Drop(usize),
    Subsequence(usize, usize),
    Select(usize),
    Clone,
}

impl Op {
    fn apply_to_vec(&self, vec: &mut Vec<u32>) {
        match self {
            Op::Append(xs) => vec.extend_from_slice(xs),
            Op::Prepend(xs) => {
                vec.splice(0..0, xs.iter().copied());
            }
            Op::ConcatSelf => {
                if vec.len() < MAX_SELF_CONCAT_LEN {
                    vec.extend_from_within(..);
                }
            }
            Op::Update(idx, x) => {
                if !vec.is_empty() {
                    let idx = idx % vec.len();
                    vec[idx] = *x;
                }
            }
            Op::Take(n) => {
                if !vec.is_empty() {
                    vec.truncate(n % vec.len());
                }
            }
            Op::Drop(n) => {
                if !vec.is_empty() {
                    vec.drain(..n % vec.len());
                }
            }
            Op::Subsequence(start, len) => {
                if !vec.is_empty() {
                    let start = start % vec.len();
                    let end = (start + len % (vec.len() - start + 1)).min(vec.len());
                    vec.truncate(end);
                    vec.drain(..start);
                }
            }
            Op::Select(_) | Op::Clone => {}
        }
    }

    // `model` holds the expected contents of `seq` before the operation.
    fn apply_to_sequence(
        &self,
        seq: &mut Sequence<u32>,
        model: &[u32],
        arena: &mut Vec<(Sequence<u32>, Vec<u32>)>,
    ) {
        match self {
            Op::Append(xs) => *seq = seq.concatenate(&Sequence::from_slice(xs)),
            Op::Prepend(xs) => *seq = Sequence::from_slice(xs).concatenate(seq),
            Op::ConcatSelf => {
                if seq.len() < MAX_SELF_CONCAT_LEN {
                    *seq = seq.concatenate(seq);
                }
            }
            Op::Update(idx, x) => {
                if !seq.is_empty() {
                    let idx = idx % seq.len();
                    *seq = seq.update(idx, *x).unwrap();
                }
            }
            Op::Take(n) => {
                if !seq.is_empty() {
                    *seq = seq.take(n % seq.len()).unwrap();
                }
            }
            Op::Drop(n) => {
                if !seq.is_empty() {
                    *seq = seq.drop(n % seq.len()).unwrap();
                }
            }
            Op::Subsequence(start, len) => {
                if !seq.is_empty() {
                    let start = start % seq.len();
                    let end = (start + len % (seq.len() - start + 1)).min(seq.len());
                    *seq = seq.subsequence(start, end).unwrap();
                }
            }
            Op::Select(idx) => {
                if !seq.is_empty() {
                    let idx = idx % seq.len();
                    assert_eq!(seq.select(idx), Ok(&seq.as_slice()[idx]));
                }
                assert!(matches!(
                    seq.select(seq.len()),
                    Err(Error::IndexOutOfRange { .. })
                ));
            }
            Op::Clone => arena.push((seq.clone(), model.to_vec())),
        }
    }
}

// u.arbitrary() generates very short vecs by default:
// https://github.com/matklad/arbtest/issues/8
fn arb_vec(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<u32>> {
    let len = u.arbitrary_len::<u32>()?;
    std::iter::from_fn(|| Some(u.arbitrary::<u32>()))
        .take(len)
        .collect()
}

// Builds a sequence holding `vec`, cut into randomly-sized concatenated pieces.
fn arb_sequence(u: &mut Unstructured<'_>, vec: &[u32]) -> arbitrary::Result<Sequence<u32>> {
    let mut seq = Sequence::empty();
    let mut rest = vec;
    while !rest.is_empty() {
        let len = u.int_in_range(1..=rest.len())?;
        let (piece, tail) = rest.split_at(len);
        seq = seq.concatenate(&Sequence::from_slice(piece));
        rest = tail;
    }
    Ok(seq)
}

#[test]
fn operations() {
    arbtest(|u| {
        let mut vec: Vec<u32> = arb_vec(u)?;
        let mut seq = arb_sequence(u, &vec)?;
        let mut arena = Vec::new();
        let ops: Vec<Op> = u.arbitrary()?;

        for op in ops {
            op.apply_to_sequence(&mut seq, &vec, &mut arena);
            op.apply_to_vec(&mut vec);

            seq.check_invariants();
            assert_eq!(seq.len(), vec.len());
            assert_eq!(vec, seq.iter().copied().collect::<Vec<_>>());
        }

        // Earlier snapshots must be untouched by everything that came after.
        for (snapshot, contents) in &arena {
            snapshot.check_invariants();
            assert_eq!(snapshot.len(), contents.len());
            assert_eq!(&snapshot.iter().copied().collect::<Vec<_>>(), contents);
            assert_eq!(snapshot.as_slice(), contents.as_slice());
        }

        Ok(())
    });
}

#[test]
fn representation_independence() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let flat = Sequence::from_slice(&vec);
        let pieces = arb_sequence(u, &vec)?;

        assert_eq!(flat, pieces);
        assert_eq!(flat.to_string(), pieces.to_string());

        let hasher = std::collections::hash_map::RandomState::new();
        assert_eq!(hasher.hash_one(&flat), hasher.hash_one(&pieces));

        Ok(())
    });
}

#[test]
fn concatenation() {
    arbtest(|u| {
        let a: Vec<u32> = arb_vec(u)?;
        let b: Vec<u32> = arb_vec(u)?;
        let seq_a = arb_sequence(u, &a)?;
        let seq_b = arb_sequence(u, &b)?;
        let fatty = seq_a.concatenate(&seq_b);

        assert_eq!(fatty.len(), a.len() + b.len());
        for (i, x) in a.iter().enumerate() {
            assert_eq!(fatty.select(i), Ok(x));
        }
        for (j, x) in b.iter().enumerate() {
            assert_eq!(fatty.select(a.len() + j), Ok(x));
        }
        assert!(seq_a.is_prefix_of(&fatty));
        assert_eq!(seq_a.is_proper_prefix_of(&fatty), !b.is_empty());

        Ok(())
    });
}

#[test]
fn prefixes() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let seq = arb_sequence(u, &vec)?;
        assert!(seq.is_prefix_of(&seq));
        assert!(!seq.is_proper_prefix_of(&seq));

        if !vec.is_empty() {
            let len = u.int_in_range(0..=vec.len() - 1)?;
            let prefix = seq.take(len).unwrap();
            assert!(prefix.is_proper_prefix_of(&seq));

            // Change the last element of a non-empty prefix.
            if len > 0 {
                let changed = prefix.update(len - 1, vec[len - 1].wrapping_add(1)).unwrap();
                assert!(!changed.is_prefix_of(&seq));
            }
        }

        Ok(())
    });
}

#[test]
fn update_isolation() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        if vec.is_empty() {
            return Ok(());
        }
        let seq = arb_sequence(u, &vec)?;
        let idx = u.int_in_range(0..=vec.len() - 1)?;
        let value: u32 = u.arbitrary()?;
        let updated = seq.update(idx, value).unwrap();

        assert_eq!(seq.iter().copied().collect::<Vec<_>>(), vec);
        for (i, x) in vec.iter().enumerate() {
            let expected = if i == idx { &value } else { x };
            assert_eq!(updated.select(i), Ok(expected));
        }

        Ok(())
    });
}

#[test]
fn slice_partitions() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let seq = arb_sequence(u, &vec)?;

        // Sorted breakpoints strictly below the length, so every part is valid.
        let mut breakpoints: Vec<usize> = if vec.is_empty() {
            Vec::new()
        } else {
            let count = u.arbitrary_len::<usize>()?;
            std::iter::from_fn(|| u.int_in_range(0..=vec.len() - 1).ok())
                .take(count)
                .collect()
        };
        breakpoints.sort_unstable();

        let parts = seq.slice(breakpoints.iter().copied()).unwrap();
        assert_eq!(parts.len(), breakpoints.len() + 1);

        let rejoined = parts
            .iter()
            .fold(Sequence::empty(), |acc, part| acc.concatenate(part));
        assert_eq!(rejoined, seq);

        Ok(())
    });
}

#[test]
fn multiset_fidelity() {
    arbtest(|u| {
        // Small values, so that there are repeats.
        let len = u.arbitrary_len::<u8>()?;
        let vec: Vec<u8> = std::iter::from_fn(|| u.int_in_range(0..=7).ok())
            .take(len)
            .collect();
        let bag = Sequence::from_slice(&vec).as_multiset();

        for value in 0..=7u8 {
            let count = vec.iter().filter(|&&x| x == value).count();
            assert_eq!(bag.multiplicity(&value), Natural::from(count as u64));
        }
        assert_eq!(bag.cardinality(), Natural::from(vec.len() as u64));

        Ok(())
    });
}
