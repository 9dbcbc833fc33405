pub mod decode_roundtrip;
