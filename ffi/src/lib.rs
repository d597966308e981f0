//! C ABI bindings for the `fips203` crate, covering ML-KEM-512/768/1024.
//!
//! Every function returns `0` on success and a negative value on failure, following the
//! conventional libsodium/liboqs C error-code idiom rather than Rust's `Result`, since this
//! crate is consumed from C. All buffers are caller-allocated and must be exactly the sizes
//! given by the corresponding `FIPS203_*_EK_LEN` / `DK_LEN` / `CT_LEN` / `SSK_LEN` constants;
//! callers that get a buffer size wrong get undefined behavior, same as any other C API working
//! over raw pointers.

#![allow(clippy::missing_safety_doc)] // documented once, above, rather than per-function

use std::slice;

use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};
use rand_core::OsRng;

macro_rules! ffi_functions {
    ($module:ident, $keygen:ident, $encaps:ident, $decaps:ident, $ek_len:ident, $dk_len:ident, $ct_len:ident, $ssk_len:ident) => {
        /// Encapsulation key length for this parameter set, in bytes.
        #[no_mangle]
        pub static $ek_len: usize = fips203::$module::EK_LEN;
        /// Decapsulation key length for this parameter set, in bytes.
        #[no_mangle]
        pub static $dk_len: usize = fips203::$module::DK_LEN;
        /// Ciphertext length for this parameter set, in bytes.
        #[no_mangle]
        pub static $ct_len: usize = fips203::$module::CT_LEN;
        /// Shared-secret length, in bytes (identical across all parameter sets).
        #[no_mangle]
        pub static $ssk_len: usize = fips203::SSK_LEN;

        /// Generates a fresh key pair, writing the encapsulation key to `ek_out` and the
        /// decapsulation key to `dk_out`.
        #[no_mangle]
        pub unsafe extern "C" fn $keygen(ek_out: *mut u8, dk_out: *mut u8) -> i32 {
            let Ok((ek, dk)) = fips203::$module::KG::try_keygen_with_rng(&mut OsRng) else {
                return -1;
            };
            let ek_bytes = ek.into_bytes();
            let dk_bytes = dk.into_bytes();
            slice::from_raw_parts_mut(ek_out, ek_bytes.len()).copy_from_slice(&ek_bytes);
            slice::from_raw_parts_mut(dk_out, dk_bytes.len()).copy_from_slice(&dk_bytes);
            0
        }

        /// Encapsulates against `ek` (exactly `$ek_len` bytes), writing the ciphertext to
        /// `ct_out` and the shared secret to `ssk_out`.
        #[no_mangle]
        pub unsafe extern "C" fn $encaps(ek: *const u8, ct_out: *mut u8, ssk_out: *mut u8) -> i32 {
            let ek_bytes: [u8; fips203::$module::EK_LEN] =
                match slice::from_raw_parts(ek, fips203::$module::EK_LEN).try_into() {
                    Ok(b) => b,
                    Err(_) => return -1,
                };
            let Ok(ek) = fips203::$module::EncapsKey::try_from_bytes(ek_bytes) else { return -2 };
            let Ok((ssk, ct)) = ek.try_encaps_with_rng(&mut OsRng) else { return -3 };
            slice::from_raw_parts_mut(ct_out, fips203::$module::CT_LEN).copy_from_slice(&ct.into_bytes());
            slice::from_raw_parts_mut(ssk_out, fips203::SSK_LEN).copy_from_slice(&ssk.into_bytes());
            0
        }

        /// Decapsulates `ct` (exactly `$ct_len` bytes) with `dk` (exactly `$dk_len` bytes),
        /// writing the recovered shared secret to `ssk_out`.
        #[no_mangle]
        pub unsafe extern "C" fn $decaps(dk: *const u8, ct: *const u8, ssk_out: *mut u8) -> i32 {
            let dk_bytes: [u8; fips203::$module::DK_LEN] =
                match slice::from_raw_parts(dk, fips203::$module::DK_LEN).try_into() {
                    Ok(b) => b,
                    Err(_) => return -1,
                };
            let ct_bytes: [u8; fips203::$module::CT_LEN] =
                match slice::from_raw_parts(ct, fips203::$module::CT_LEN).try_into() {
                    Ok(b) => b,
                    Err(_) => return -2,
                };
            let Ok(dk) = fips203::$module::DecapsKey::try_from_bytes(dk_bytes) else { return -3 };
            let Ok(ct) = fips203::$module::CipherText::try_from_bytes(ct_bytes) else { return -4 };
            let Ok(ssk) = dk.try_decaps(&ct) else { return -5 };
            slice::from_raw_parts_mut(ssk_out, fips203::SSK_LEN).copy_from_slice(&ssk.into_bytes());
            0
        }
    };
}

#[cfg(feature = "ml-kem-512")]
ffi_functions!(
    ml_kem_512,
    fips203_ml_kem_512_keygen,
    fips203_ml_kem_512_encaps,
    fips203_ml_kem_512_decaps,
    FIPS203_ML_KEM_512_EK_LEN,
    FIPS203_ML_KEM_512_DK_LEN,
    FIPS203_ML_KEM_512_CT_LEN,
    FIPS203_ML_KEM_512_SSK_LEN
);

#[cfg(feature = "ml-kem-768")]
ffi_functions!(
    ml_kem_768,
    fips203_ml_kem_768_keygen,
    fips203_ml_kem_768_encaps,
    fips203_ml_kem_768_decaps,
    FIPS203_ML_KEM_768_EK_LEN,
    FIPS203_ML_KEM_768_DK_LEN,
    FIPS203_ML_KEM_768_CT_LEN,
    FIPS203_ML_KEM_768_SSK_LEN
);

#[cfg(feature = "ml-kem-1024")]
ffi_functions!(
    ml_kem_1024,
    fips203_ml_kem_1024_keygen,
    fips203_ml_kem_1024_encaps,
    fips203_ml_kem_1024_decaps,
    FIPS203_ML_KEM_1024_EK_LEN,
    FIPS203_ML_KEM_1024_DK_LEN,
    FIPS203_ML_KEM_1024_CT_LEN,
    FIPS203_ML_KEM_1024_SSK_LEN
);
