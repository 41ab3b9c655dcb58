use proptest::prelude::*;

use sigtx_primitives::chainhash::Hash;
use sigtx_primitives::ec::private_key::{PrivateKey, MAINNET_WIF_PREFIX};
use sigtx_primitives::ec::Signature;
use sigtx_primitives::hash::sha256;
use sigtx_primitives::util::{ByteReader, VarInt};
use sigtx_primitives::PrimitivesError;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wif_roundtrip(seed in prop::array::uniform32(any::<u8>())) {
        // Zero and values >= N are not keys.
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let back = PrivateKey::from_wif(&pk.to_wif(MAINNET_WIF_PREFIX)).unwrap();
            prop_assert_eq!(back, pk);
        }
    }

    #[test]
    fn sign_then_verify_through_der(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let digest = sha256(&msg);
            let der = pk.sign(&digest).unwrap().to_der();
            let parsed = Signature::from_der(&der).unwrap();
            prop_assert!(pk.pub_key().verify(&digest, &parsed));
        }
    }

    #[test]
    fn from_der_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..80)) {
        let _ = Signature::from_der(&bytes);
    }

    #[test]
    fn hash_display_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let hash = Hash::new(bytes);
        prop_assert_eq!(Hash::from_hex(&hash.to_string()).unwrap(), hash);
    }

    #[test]
    fn varint_length_matches_encoding(value in any::<u64>()) {
        let vi = VarInt(value);
        let bytes = vi.to_bytes();
        prop_assert_eq!(bytes.len(), vi.length());
        prop_assert_eq!(ByteReader::new(&bytes).read_varint().unwrap(), vi);
    }

    #[test]
    fn varint_widened_form_is_rejected(value in 0u64..0x1_0000_0000) {
        // Write the value with the 9-byte marker, wider than it ever needs.
        let mut bytes = vec![0xff];
        bytes.extend_from_slice(&value.to_le_bytes());
        prop_assert!(
            matches!(
                ByteReader::new(&bytes).read_varint(),
                Err(PrimitivesError::NonCanonicalVarInt { marker: 0xff, .. })
            ),
            "value {}",
            value
        );
    }
}
