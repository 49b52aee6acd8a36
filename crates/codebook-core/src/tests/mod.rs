//! End-to-end tests for the estimation pipeline
//!
//! Everything here drives [`estimate_codebook`] through its public surface;
//! the numerical stages have their own unit tests next to the code.

use crate::estimator::{buckets, transforms};
use crate::types::{FRAME_SIZE, VECTOR_SIZE};
use crate::{estimate_codebook, AdpcmBook, CodebookError, SampleEncoding, Threshold};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Damped two-tone test signal; loud, stable, and aperiodic enough to
/// exercise every gate
fn generate_test_signal(frames: usize) -> Vec<i16> {
    (0..frames * FRAME_SIZE)
        .map(|i| {
            let t = i as f64;
            let tone = (t * 0.31).sin() * 9000.0 + (t * 0.077).sin() * 4000.0;
            (tone * (-t / 2000.0).exp()) as i16
        })
        .collect()
}

/// Seeded noise signal; deterministic across runs
fn generate_noise_signal(frames: usize, seed: u64) -> Vec<i16> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..frames * FRAME_SIZE)
        .map(|_| rng.gen_range(-12000..12000))
        .collect()
}

/// Encode samples as a little-endian byte buffer
fn to_le_buffer(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Encode samples as a big-endian byte buffer
fn to_be_buffer(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

#[test]
fn test_book_has_contract_dimensions() {
    let buffer = to_le_buffer(&generate_test_signal(24));

    for order in [1, 2, 4, 8] {
        for npredictors in [1, 3, 8] {
            let book =
                estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, order, npredictors)
                    .unwrap();
            assert_eq!(book.order(), order);
            assert_eq!(book.npredictors(), npredictors);
            assert_eq!(book.entries().len(), order * VECTOR_SIZE * npredictors);
            assert_eq!(book.to_be_bytes().len(), book.entries().len() * 2);
        }
    }
}

#[test]
fn test_estimation_is_deterministic() {
    let buffer = to_le_buffer(&generate_noise_signal(32, 17));

    let first = estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 2, 4).unwrap();
    let second = estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 2, 4).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_endianness_tags_agree() {
    let samples = generate_test_signal(16);

    let le = estimate_codebook(&to_le_buffer(&samples), SampleEncoding::LittleEndian, None, 2, 2)
        .unwrap();
    let be =
        estimate_codebook(&to_be_buffer(&samples), SampleEncoding::BigEndian, None, 2, 2).unwrap();

    assert_eq!(le, be);
}

#[test]
fn test_silent_input_yields_zero_book() {
    let buffer = vec![0u8; FRAME_SIZE * 2 * 8];

    let book = estimate_codebook(&buffer, SampleEncoding::BigEndian, None, 2, 2).unwrap();

    assert!(book.entries().iter().all(|&e| e == 0));
}

#[test]
fn test_no_threshold_equals_permissive_thresholds() {
    let buffer = to_le_buffer(&generate_test_signal(20));

    let unfiltered = estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 2, 2).unwrap();
    let absolute = estimate_codebook(
        &buffer,
        SampleEncoding::LittleEndian,
        Some(Threshold::Absolute {
            min: 0.0,
            max: f64::INFINITY,
        }),
        2,
        2,
    )
    .unwrap();
    let quantile = estimate_codebook(
        &buffer,
        SampleEncoding::LittleEndian,
        Some(Threshold::Quantile { min: 0.0, max: 1.0 }),
        2,
        2,
    )
    .unwrap();

    assert_eq!(unfiltered, absolute);
    assert_eq!(unfiltered, quantile);
}

#[test]
fn test_exclusive_threshold_filters_every_frame() {
    let buffer = to_le_buffer(&generate_test_signal(20));

    // Nothing survives the filter, so every bucket is empty and the known
    // NaN-averaging defect collapses each predictor to zeros.
    let book = estimate_codebook(
        &buffer,
        SampleEncoding::LittleEndian,
        Some(Threshold::Absolute {
            min: 1.0e18,
            max: 1.0e19,
        }),
        2,
        2,
    )
    .unwrap();

    assert!(book.entries().iter().all(|&e| e == 0));
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let buffer = to_le_buffer(&generate_test_signal(4));

    assert!(matches!(
        estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 0, 1),
        Err(CodebookError::InvalidOrder { .. })
    ));
    assert!(matches!(
        estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 9, 1),
        Err(CodebookError::InvalidOrder { .. })
    ));
    assert!(matches!(
        estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 2, 0),
        Err(CodebookError::InvalidPredictorCount { .. })
    ));
    assert!(matches!(
        estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 2, 9),
        Err(CodebookError::InvalidPredictorCount { .. })
    ));
    assert!(matches!(
        estimate_codebook(
            &buffer,
            SampleEncoding::LittleEndian,
            Some(Threshold::Quantile { min: -0.1, max: 1.0 }),
            2,
            1
        ),
        Err(CodebookError::InvalidQuantile { .. })
    ));
    assert!(matches!(
        estimate_codebook(
            &buffer,
            SampleEncoding::LittleEndian,
            Some(Threshold::Quantile { min: 0.0, max: 1.5 }),
            2,
            1
        ),
        Err(CodebookError::InvalidQuantile { .. })
    ));
}

#[test]
fn test_short_buffer_yields_zero_book() {
    // Less than one frame: no observations at all
    let buffer = to_le_buffer(&generate_test_signal(1)[..FRAME_SIZE / 2]);

    let book = estimate_codebook(&buffer, SampleEncoding::LittleEndian, None, 4, 2).unwrap();
    assert!(book.entries().iter().all(|&e| e == 0));
}

#[test]
fn test_reference_predictor_chain() {
    // Synthesis output quantized into a fresh book must reproduce the
    // reference table exactly.
    let row = crate::estimator::synthesis::codebook_row_from_predictors(&[0.757515, -0.023203]);
    let mut book = AdpcmBook::new(2, 1).unwrap();
    book.set_predictor(&row, 0);

    assert_eq!(
        book.entries(),
        &[48, -36, 28, -22, 18, -14, 11, -9, -1551, 1223, -962, 757, -596, 469, -369, 291]
    );
}

proptest! {
    #[test]
    fn prop_estimation_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = estimate_codebook(&bytes, SampleEncoding::LittleEndian, None, 3, 2);
    }

    #[test]
    fn prop_estimation_is_deterministic(seed in any::<u64>()) {
        let buffer = to_le_buffer(&generate_noise_signal(8, seed));
        let first = estimate_codebook(&buffer, SampleEncoding::BigEndian, None, 2, 2).unwrap();
        let second = estimate_codebook(&buffer, SampleEncoding::BigEndian, None, 2, 2).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_accepted_reflections_stay_inside_unit_circle(
        ar_tail in proptest::collection::vec(-4.0f64..4.0, 1..=8)
    ) {
        // Adversarial AR parameters either fail the stability gate or come
        // out clamped strictly inside (-1, 1); nothing out of range may
        // ever reach the codebook.
        let mut ar = vec![1.0];
        ar.extend_from_slice(&ar_tail);
        let mut reflection = vec![0.0; ar_tail.len()];

        if transforms::stable_kfroma(&ar, &mut reflection) {
            transforms::clamp_reflection(&mut reflection);
            for &k in &reflection {
                prop_assert!(k > -1.0 && k < 1.0);
            }
        }
    }

    #[test]
    fn prop_bucket_partition_is_total(total in 0usize..2000, npredictors in 1usize..=8) {
        let mut sizes = vec![0usize; npredictors];
        for position in 0..total {
            let bucket = buckets::get_bucket_from_frame(position, npredictors, total);
            prop_assert!(bucket < npredictors);
            sizes[bucket] += 1;
        }
        prop_assert_eq!(sizes.iter().sum::<usize>(), total);
    }
}
