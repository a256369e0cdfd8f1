use md5::{Digest, Md5};

/// Prepended to the video id before hashing.
pub const EXTERNAL_ID_PREFIX: &str = "dj";

/// Key prefix every cover lives under.
pub const COVER_KEY_PREFIX: &str = "video/cover/";

const COVER_EXTENSION: &str = ".jpg";

/// Content-Type covers are stored with; matches the `.jpg` key suffix.
pub const COVER_CONTENT_TYPE: &str = "image/jpeg";

/// The synthetic identifier fed to the hash. No separator, no validation.
pub fn external_id(video_id: &str) -> String {
    format!("{}{}", EXTERNAL_ID_PREFIX, video_id)
}

/// Lowercase hex MD5 of `input`.
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}

/// Storage key for a video's cover: `video/cover/<md5("dj" + id)>.jpg`.
pub fn cover_key(video_id: &str) -> String {
    let file = format!("{}{}", md5_hex(&external_id(video_id)), COVER_EXTENSION);
    format!("{}{}", COVER_KEY_PREFIX, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_cover_key(key: &str) -> bool {
        let Some(rest) = key.strip_prefix("video/cover/") else {
            return false;
        };
        let Some(digest) = rest.strip_suffix(".jpg") else {
            return false;
        };
        digest.len() == 32 && digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn known_video_id_maps_to_known_key() {
        assert_eq!(external_id("55123"), "dj55123");
        assert_eq!(md5_hex("dj55123"), "0715cb7c0c21cfcaf1267d99465dd491");
        assert_eq!(
            cover_key("55123"),
            "video/cover/0715cb7c0c21cfcaf1267d99465dd491.jpg"
        );
    }

    #[test]
    fn key_is_deterministic() {
        for id in ["1", "55123", "987654321"] {
            assert_eq!(cover_key(id), cover_key(id));
        }
        assert_ne!(cover_key("1"), cover_key("2"));
    }

    #[test]
    fn odd_ids_are_hashed_as_text() {
        assert_eq!(
            cover_key(""),
            "video/cover/64ca60972a6ec926d1c4b9d31080c687.jpg"
        );
        assert_eq!(
            cover_key("abc"),
            "video/cover/ad3b6fce223ef69891b836480ccfaebd.jpg"
        );
    }

    #[test]
    fn every_key_has_cover_shape() {
        for id in ["", "0", "55123", "abc", "漢字", "id with spaces", "/leading"] {
            let key = cover_key(id);
            assert!(is_cover_key(&key), "unexpected key {key} for {id:?}");
        }
    }
}
