//! Unit tests for CCNx names

#[cfg(test)]
mod tests {
    use super::super::*;
    use bytes::{BufMut, Bytes, BytesMut};

    #[test]
    fn test_name_from_uri() {
        let name = Name::from_uri("/test/data/1", false).unwrap();

        assert_eq!(name.len(), 3);
        assert_eq!(&name.segments()[0].value[..], b"test");
        assert_eq!(&name.segments()[1].value[..], b"data");
        assert_eq!(&name.segments()[2].value[..], b"1");
        assert!(name.segments().iter().all(|s| s.segment_type == SEGMENT_NAME));

        assert_eq!(name.to_string(), "/test/data/1");
    }

    #[test]
    fn test_root_and_empty_uri() {
        assert!(Name::from_uri("", false).unwrap().is_empty());
        assert!(Name::from_uri("/", true).unwrap().is_empty());
        assert_eq!(Name::new().to_string(), "/");
    }

    #[test]
    fn test_uri_slashes() {
        let name: Name = "/a/".parse().unwrap();
        assert_eq!(name.len(), 1);

        let name: Name = "a//b".parse().unwrap();
        assert_eq!(name.len(), 3);
        assert!(name.get(1).unwrap().value.is_empty());
    }

    #[test]
    fn test_chunk_last() {
        let name = Name::from_uri("/video/seg/7", true).unwrap();
        assert_eq!(name.get(0).unwrap().segment_type, SEGMENT_NAME);
        assert_eq!(name.get(1).unwrap().segment_type, SEGMENT_NAME);
        assert!(name.get(2).unwrap().is_chunk());
        assert_eq!(name.to_string(), "/video/seg/0x0010=7");
    }

    #[test]
    fn test_name_compare() {
        let name1: Name = "/a/b/c".parse().unwrap();
        let name2: Name = "/a/b/c".parse().unwrap();
        let name3: Name = "/a/b/d".parse().unwrap();
        let name4: Name = "/a/b".parse().unwrap();

        assert_eq!(name1, name2);
        assert_ne!(name1, name3);
        assert_ne!(name1, name4);

        assert!(name4.is_prefix_of(&name1));
        assert!(!name1.is_prefix_of(&name4));
        assert!(!name3.is_prefix_of(&name1));
        assert_eq!(name1.prefix(2), name4);
        assert_eq!(name1.prefix(10), name1);
    }

    #[test]
    fn test_encode_layout() {
        let name: Name = "/1/2/3".parse().unwrap();
        let wire = name.to_tlv_bytes().unwrap();
        assert_eq!(
            &wire[..],
            &[
                0x00, 0x00, 0x00, 0x0F, //
                0x00, 0x01, 0x00, 0x01, b'1', //
                0x00, 0x01, 0x00, 0x01, b'2', //
                0x00, 0x01, 0x00, 0x01, b'3',
            ]
        );
        assert_eq!(name.encoded_len(), 15);
        assert_eq!(Name::from_tlv_bytes(&wire).unwrap(), name);

        // The root name is just the outer header.
        assert_eq!(&Name::new().to_tlv_bytes().unwrap()[..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_mixed_segments() {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0x00, 0x02, 0x00, 0x04]);
        buf.put_slice(b"hell");
        buf.put_slice(&[0xF0, 0x00, 0x00, 0x04]);
        buf.put_slice(b"ouch");
        buf.put_slice(&[0x00, 0x01, 0x00, 0x00]);
        let buf = buf.freeze();

        let name = Name::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(name.len(), 3);
        assert_eq!(name.get(0).unwrap().segment_type, SEGMENT_PAYLOAD_ID);
        assert_eq!(name.get(1).unwrap().segment_type, 0xF000);
        assert_eq!(&name.get(1).unwrap().value[..], b"ouch");
        assert!(name.get(2).unwrap().value.is_empty());

        let mut again = BytesMut::new();
        name.encode(&mut again).unwrap();
        assert_eq!(again.freeze(), buf);
    }

    #[test]
    fn test_decode_empty_range() {
        let buf = Bytes::from_static(&[0x00, 0x01, 0x00, 0x01, b'x']);
        assert!(Name::decode(&buf, 3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated_header() {
        let buf = Bytes::from_static(&[0x00, 0x01, 0x00, 0x01, b'x', 0x00, 0x01]);
        let err = Name::decode(&buf, 0, buf.len()).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Underrun);
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn test_decode_value_overrun() {
        let buf = Bytes::from_static(&[0x00, 0x01, 0x00, 0x05, b'x', b'y']);
        let err = Name::decode(&buf, 0, buf.len()).unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Overrun);

        // `end` may cut a segment that the buffer itself would hold.
        let buf = Bytes::from_static(&[0x00, 0x01, 0x00, 0x02, b'x', b'y']);
        assert!(Name::decode(&buf, 0, 5).is_err());
        assert!(Name::decode(&buf, 0, 7).is_err());
    }

    #[test]
    fn test_from_tlv_bytes_rejects_bad_outer_header() {
        let wrong_type = Bytes::from_static(&[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            Name::from_tlv_bytes(&wrong_type).unwrap_err().kind(),
            CodecErrorKind::TypeMismatch
        );

        let wrong_len = Bytes::from_static(&[0x00, 0x00, 0x00, 0x09, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            Name::from_tlv_bytes(&wrong_len).unwrap_err().kind(),
            CodecErrorKind::LengthMismatch
        );
    }

    #[test]
    fn test_binary_segment_display() {
        let mut name = Name::new();
        name.push(NameSegment::generic(vec![0x00, 0xff]))
            .push(NameSegment::generic(&b"ok"[..]));
        assert_eq!(name.to_string(), "/0x00ff/ok");
    }

    #[test]
    fn test_serde_round_trip() {
        let name: Name = "/a/b".parse().unwrap();
        let json = serde_json::to_string(&name).unwrap();
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
