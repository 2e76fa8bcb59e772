//! Request intake: from body to raw bytes

mod resolver;

pub use resolver::{
    decode_base64, decode_binary_data, parse_json_body, ExtractTextRequest, TransportResolver,
    UploadedPart, DOWNLOAD_PLACEHOLDER_NAME, UPLOAD_FIELDS,
};
