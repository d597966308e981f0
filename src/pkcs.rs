//! PKCS#8 / SPKI DER encoding for encapsulation and decapsulation keys.
//!
//! Deliberately minimal relative to the wider PKCS #8 Kyber certificate profile: this only
//! ever writes and reads the "expanded" decapsulation-key form (the raw `dk` bytes wrapped in
//! an `OCTET STRING`), never the `seed`/`both` forms a fuller profile also supports — the
//! per-parameter-set modules only ever hand this layer keys they already have in expanded
//! form, so there is no seed to round-trip.

use alloc::vec;
use alloc::vec::Vec;

use simple_asn1::{ASN1Block, BigUint, OID};

/// ASN.1 object identifier for a parameter set's PKCS#8/SPKI key containers.
pub struct Oid(
    /// OID arc components, e.g. `&[2, 16, 840, 1, 101, 3, 4, 4, 1]`.
    pub &'static [u64],
);

impl Oid {
    fn to_asn1(&self) -> OID { OID::new(self.0.iter().map(|&c| BigUint::from(c)).collect()) }
}

/// Failures encoding or decoding a PKCS#8/SPKI container.
#[derive(Debug)]
pub enum PkcsError {
    /// DER encoding failed.
    Encode,
    /// DER decoding failed, or the structure did not match the expected shape.
    Decode,
    /// The OID present in the container did not match the expected parameter set.
    OidMismatch,
}

/// Encodes an encapsulation key as a minimal SPKI DER structure:
/// `SEQUENCE { SEQUENCE { OID }, BIT STRING }`.
///
/// # Errors
/// Returns [`PkcsError::Encode`] if DER serialization fails.
pub fn encaps_key_to_der(oid: &Oid, ek: &[u8]) -> Result<Vec<u8>, PkcsError> {
    let alg_id = ASN1Block::Sequence(0, vec![ASN1Block::ObjectIdentifier(0, oid.to_asn1())]);
    let spki = ASN1Block::Sequence(0, vec![alg_id, ASN1Block::BitString(0, ek.len() * 8, ek.to_vec())]);
    simple_asn1::to_der(&spki).map_err(|_| PkcsError::Encode)
}

/// Decodes a minimal SPKI DER structure produced by [`encaps_key_to_der`], checking the
/// embedded OID against `oid`.
///
/// # Errors
/// Returns [`PkcsError::Decode`] on malformed DER, [`PkcsError::OidMismatch`] if the embedded
/// OID does not match `oid`.
pub fn encaps_key_from_der(oid: &Oid, der: &[u8]) -> Result<Vec<u8>, PkcsError> {
    let blocks = simple_asn1::from_der(der).map_err(|_| PkcsError::Decode)?;
    let [ASN1Block::Sequence(_, outer)] = blocks.as_slice() else { return Err(PkcsError::Decode) };
    let [ASN1Block::Sequence(_, alg_id), ASN1Block::BitString(_, _, ek)] = outer.as_slice() else {
        return Err(PkcsError::Decode);
    };
    let [ASN1Block::ObjectIdentifier(_, found)] = alg_id.as_slice() else {
        return Err(PkcsError::Decode);
    };
    if *found != oid.to_asn1() {
        return Err(PkcsError::OidMismatch);
    }
    Ok(ek.clone())
}

/// Encodes a decapsulation key as a minimal PKCS#8 DER structure, expanded form only:
/// `SEQUENCE { INTEGER 0, SEQUENCE { OID }, OCTET STRING { OCTET STRING dk } }`.
///
/// # Errors
/// Returns [`PkcsError::Encode`] if DER serialization fails.
pub fn decaps_key_to_der(oid: &Oid, dk: &[u8]) -> Result<Vec<u8>, PkcsError> {
    let alg_id = ASN1Block::Sequence(0, vec![ASN1Block::ObjectIdentifier(0, oid.to_asn1())]);
    let inner = ASN1Block::OctetString(0, dk.to_vec());
    let inner_der = simple_asn1::to_der(&inner).map_err(|_| PkcsError::Encode)?;
    let pkcs8 = ASN1Block::Sequence(
        0,
        vec![ASN1Block::Integer(0, 0.into()), alg_id, ASN1Block::OctetString(0, inner_der)],
    );
    simple_asn1::to_der(&pkcs8).map_err(|_| PkcsError::Encode)
}

/// Decodes a minimal PKCS#8 DER structure produced by [`decaps_key_to_der`].
///
/// # Errors
/// Returns [`PkcsError::Decode`] on malformed DER, [`PkcsError::OidMismatch`] if the embedded
/// OID does not match `oid`.
pub fn decaps_key_from_der(oid: &Oid, der: &[u8]) -> Result<Vec<u8>, PkcsError> {
    let blocks = simple_asn1::from_der(der).map_err(|_| PkcsError::Decode)?;
    let [ASN1Block::Sequence(_, outer)] = blocks.as_slice() else { return Err(PkcsError::Decode) };
    let [ASN1Block::Integer(_, version), ASN1Block::Sequence(_, alg_id), ASN1Block::OctetString(_, wrapped)] =
        outer.as_slice()
    else {
        return Err(PkcsError::Decode);
    };
    if *version != 0.into() {
        return Err(PkcsError::Decode);
    }
    let [ASN1Block::ObjectIdentifier(_, found)] = alg_id.as_slice() else {
        return Err(PkcsError::Decode);
    };
    if *found != oid.to_asn1() {
        return Err(PkcsError::OidMismatch);
    }
    let inner_blocks = simple_asn1::from_der(wrapped).map_err(|_| PkcsError::Decode)?;
    let [ASN1Block::OctetString(_, dk)] = inner_blocks.as_slice() else {
        return Err(PkcsError::Decode);
    };
    Ok(dk.clone())
}


#[cfg(test)]
mod tests {
    use super::{decaps_key_from_der, decaps_key_to_der, encaps_key_from_der, encaps_key_to_der, Oid};

    const ML_KEM_512_OID: Oid = Oid(&[2, 16, 840, 1, 101, 3, 4, 4, 1]);

    #[test]
    fn encaps_key_round_trips() {
        let ek = [0x42u8; 800];
        let der = encaps_key_to_der(&ML_KEM_512_OID, &ek).unwrap();
        let decoded = encaps_key_from_der(&ML_KEM_512_OID, &der).unwrap();
        assert_eq!(decoded, ek.to_vec());
    }

    #[test]
    fn decaps_key_round_trips() {
        let dk = [0x24u8; 1632];
        let der = decaps_key_to_der(&ML_KEM_512_OID, &dk).unwrap();
        let decoded = decaps_key_from_der(&ML_KEM_512_OID, &der).unwrap();
        assert_eq!(decoded, dk.to_vec());
    }

    #[test]
    fn mismatched_oid_is_rejected() {
        const OTHER: Oid = Oid(&[2, 16, 840, 1, 101, 3, 4, 4, 2]);
        let ek = [0x11u8; 800];
        let der = encaps_key_to_der(&ML_KEM_512_OID, &ek).unwrap();
        assert!(encaps_key_from_der(&OTHER, &der).is_err());
    }
}
