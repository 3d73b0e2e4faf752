use crate::{
    config::TokenOptions,
    db::cursor::{
        BinaryStreamer, CompressingStreamer, ContinuationToken, HashingStreamer, TokenError,
        TokenSchema, TokenStreamer,
    },
    value::{TaggedValueCodec, ValueCodec},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::{fmt, sync::Arc};

// Upper bound on inflated payload size relative to the text limit.
const MAX_INFLATE_RATIO: usize = 32;

///
/// TokenCodec
///
/// Text stage plus the assembled stage chain for one token schema.
///
/// The empty string and [`ContinuationToken::None`] map to each other and
/// never pass through the stages.
///

pub struct TokenCodec {
    schema: TokenSchema,
    options: TokenOptions,
    streamer: Box<dyn TokenStreamer>,
}

impl TokenCodec {
    #[must_use]
    pub fn new(schema: TokenSchema, options: TokenOptions) -> Self {
        Self::with_codec(schema, options, Arc::new(TaggedValueCodec))
    }

    /// Build the chain over a caller-supplied value codec.
    #[must_use]
    pub fn with_codec(
        schema: TokenSchema,
        options: TokenOptions,
        codec: Arc<dyn ValueCodec>,
    ) -> Self {
        let mut streamer: Box<dyn TokenStreamer> =
            Box::new(BinaryStreamer::new(schema.clone(), codec));

        if options.use_compression {
            let max_output = options.max_token_len.saturating_mul(MAX_INFLATE_RATIO);
            streamer = Box::new(CompressingStreamer::new(streamer, max_output));
        }
        if options.include_hash {
            streamer = Box::new(HashingStreamer::new(streamer));
        }

        Self {
            schema,
            options,
            streamer,
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &TokenSchema {
        &self.schema
    }

    #[must_use]
    pub const fn options(&self) -> TokenOptions {
        self.options
    }

    /// Serialize a token to its opaque text form.
    ///
    /// Fails only for a token that does not fit this codec's schema. The text
    /// limit is not applied here; it bounds what [`Self::deserialize`]
    /// accepts.
    pub fn serialize(&self, token: &ContinuationToken) -> Result<String, TokenError> {
        if token.is_none() {
            return Ok(String::new());
        }

        let bytes = self.streamer.write_token(token)?;

        Ok(STANDARD.encode(bytes))
    }

    /// Decode a token, failing with a typed reason.
    ///
    /// Only the exact empty string resolves to [`ContinuationToken::None`].
    pub fn deserialize(&self, text: &str) -> Result<ContinuationToken, TokenError> {
        if text.is_empty() {
            return Ok(ContinuationToken::None);
        }

        if text.len() > self.options.max_token_len {
            return Err(TokenError::malformed(format!(
                "token exceeds max length: {} chars (max {})",
                text.len(),
                self.options.max_token_len
            )));
        }

        let bytes = STANDARD
            .decode(text)
            .map_err(|err| TokenError::malformed(format!("invalid base64: {err}")))?;

        self.streamer.read_token(&bytes)
    }

    /// Decode a token, discarding the failure reason.
    #[must_use]
    pub fn try_deserialize(&self, text: &str) -> Option<ContinuationToken> {
        self.deserialize(text).ok()
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
