//! Exercises the deterministic AES-256-CTR_DRBG end-to-end against `KeyGen`/`Encaps`/`Decaps`,
//! standing in for the NIST/CCTV known-answer-test fixtures (not vendored into this repository;
//! a downstream consumer can point the same harness at those fixtures without code changes).

use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};
use fips203::CtrDrbg;

#[cfg(feature = "ml-kem-512")]
#[test]
fn ml_kem_512_drbg_round_trip() {
    use fips203::ml_kem_512;

    let seed: [u8; 48] = core::array::from_fn(|i| i as u8);
    let mut drbg = CtrDrbg::new();
    drbg.instantiate(&seed, b"nist-vectors-stand-in");

    let (ek, dk) = ml_kem_512::KG::try_keygen_with_rng(&mut drbg).unwrap();
    let ek_bytes = ek.into_bytes();
    let ek = ml_kem_512::EncapsKey::try_from_bytes(ek_bytes).unwrap();

    let (ssk1, ct) = ek.try_encaps_with_rng(&mut drbg).unwrap();
    let ssk2 = dk.try_decaps(&ct).unwrap();
    assert_eq!(ssk1, ssk2);
}

#[cfg(feature = "ml-kem-768")]
#[test]
fn ml_kem_768_drbg_round_trip() {
    use fips203::ml_kem_768;

    let seed: [u8; 48] = core::array::from_fn(|i| (i * 3 + 1) as u8);
    let mut drbg = CtrDrbg::new();
    drbg.instantiate(&seed, &[]);

    let (ek, dk) = ml_kem_768::KG::try_keygen_with_rng(&mut drbg).unwrap();
    let (ssk1, ct) = ek.try_encaps_with_rng(&mut drbg).unwrap();
    let ssk2 = dk.try_decaps(&ct).unwrap();
    assert_eq!(ssk1, ssk2);
}

#[cfg(feature = "kyber-512")]
#[test]
fn kyber512_drbg_round_trip() {
    use fips203::kyber512;

    let seed: [u8; 48] = core::array::from_fn(|i| (i * 7 + 2) as u8);
    let mut drbg = CtrDrbg::new();
    drbg.instantiate(&seed, &[]);

    let (ek, dk) = kyber512::KG::try_keygen_with_rng(&mut drbg).unwrap();
    let (ssk1, ct) = ek.try_encaps_with_rng(&mut drbg).unwrap();
    let ssk2 = dk.try_decaps(&ct).unwrap();
    assert_eq!(ssk1, ssk2);
}
