use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use mime::Mime;
use rand::RngCore;

const NAME_ENTROPY_BYTES: usize = 32;

/// Random storage name with the extension implied by `media_type`,
/// e.g. `video/mp4` gives `<43 base64url chars>.mp4`.
///
/// Never derived from the client's file name or the file's content.
pub fn content_name(media_type: &Mime) -> String {
    let mut bytes = [0u8; NAME_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{}.{}", URL_SAFE_NO_PAD.encode(bytes), media_type.subtype())
}
