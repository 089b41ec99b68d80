use crate::error::ConfigError;

/// Immutable, validated configuration for a [`crate::Session`].
///
/// Constructed through [`ClientConfigBuilder`]; see its documentation for an example.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    pub(crate) sp_code: String,
    pub(crate) gateway_username: String,
    pub(crate) gateway_password: String,
    pub(crate) gateway_signature: String,
    pub(crate) service_id: String,
    pub(crate) disable_long_message: bool,
    pub(crate) send_long_message_as_short_messages: bool,
    pub(crate) prepositive_gateway_signature: bool,
    pub(crate) attempt_remove_signature: bool,
    pub(crate) fee_type: String,
    pub(crate) fee_code: String,
}

impl ClientConfig {
    /// Starts building a new configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn sp_code(&self) -> &str {
        &self.sp_code
    }

    pub fn gateway_username(&self) -> &str {
        &self.gateway_username
    }

    pub fn gateway_password(&self) -> &str {
        &self.gateway_password
    }

    pub fn gateway_signature(&self) -> &str {
        &self.gateway_signature
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn disable_long_message(&self) -> bool {
        self.disable_long_message
    }

    pub fn send_long_message_as_short_messages(&self) -> bool {
        self.send_long_message_as_short_messages
    }

    pub fn prepositive_gateway_signature(&self) -> bool {
        self.prepositive_gateway_signature
    }

    pub fn attempt_remove_signature(&self) -> bool {
        self.attempt_remove_signature
    }

    pub fn fee_type(&self) -> &str {
        &self.fee_type
    }

    pub fn fee_code(&self) -> &str {
        &self.fee_code
    }
}

/// A builder for [`ClientConfig`].
///
/// ```rust
/// use cmpp::ClientConfigBuilder;
///
/// let config = ClientConfigBuilder::new()
///     .sp_code("106575")
///     .gateway_username("600001")
///     .gateway_password("password")
///     .service_id("SP001")
///     .build()
///     .unwrap();
/// assert_eq!(config.sp_code(), "106575");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
    sp_code: Option<String>,
    gateway_username: Option<String>,
    gateway_password: Option<String>,
    gateway_signature: Option<String>,
    service_id: Option<String>,
    disable_long_message: bool,
    send_long_message_as_short_messages: bool,
    prepositive_gateway_signature: bool,
    attempt_remove_signature: bool,
    fee_type: Option<String>,
    fee_code: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 6-digit service-provider short code.
    pub fn sp_code<S: AsRef<str>>(&mut self, sp_code: S) -> &mut Self {
        self.sp_code = Some(sp_code.as_ref().to_owned());
        self
    }

    /// Sets the gateway logon username.
    pub fn gateway_username<S: AsRef<str>>(&mut self, username: S) -> &mut Self {
        self.gateway_username = Some(username.as_ref().to_owned());
        self
    }

    /// Sets the gateway logon password.
    pub fn gateway_password<S: AsRef<str>>(&mut self, password: S) -> &mut Self {
        self.gateway_password = Some(password.as_ref().to_owned());
        self
    }

    /// Sets the service-provider signature appended or prepended to outbound content.
    pub fn gateway_signature<S: AsRef<str>>(&mut self, signature: S) -> &mut Self {
        self.gateway_signature = Some(signature.as_ref().to_owned());
        self
    }

    /// Sets the business service tag carried in every `SUBMIT`.
    pub fn service_id<S: AsRef<str>>(&mut self, service_id: S) -> &mut Self {
        self.service_id = Some(service_id.as_ref().to_owned());
        self
    }

    /// Disables concatenated long SMS: any content that would require more than one fragment
    /// is rejected with [`crate::SendStatus::MessageTooLong`].
    pub fn disable_long_message(&mut self, value: bool) -> &mut Self {
        self.disable_long_message = value;
        self
    }

    /// When set, long content is split into independent short SMS pieces instead of a
    /// concatenated long SMS.
    pub fn send_long_message_as_short_messages(&mut self, value: bool) -> &mut Self {
        self.send_long_message_as_short_messages = value;
        self
    }

    /// When set, [`ClientConfigBuilder::gateway_signature`] leads every fragment; otherwise it
    /// trails.
    pub fn prepositive_gateway_signature(&mut self, value: bool) -> &mut Self {
        self.prepositive_gateway_signature = value;
        self
    }

    /// When set, `MsgFmt` is sent as the carrier-specific `0x0F` ("Special") marker and the
    /// signature's length is not counted against the single-SMS threshold.
    pub fn attempt_remove_signature(&mut self, value: bool) -> &mut Self {
        self.attempt_remove_signature = value;
        self
    }

    /// Sets the `FeeType` field carried in every `SUBMIT` (default `"02"`, i.e. free-of-charge).
    pub fn fee_type<S: AsRef<str>>(&mut self, fee_type: S) -> &mut Self {
        self.fee_type = Some(fee_type.as_ref().to_owned());
        self
    }

    /// Sets the `FeeCode` field carried in every `SUBMIT` (default `"05"`).
    pub fn fee_code<S: AsRef<str>>(&mut self, fee_code: S) -> &mut Self {
        self.fee_code = Some(fee_code.as_ref().to_owned());
        self
    }

    /// Validates the accumulated fields and produces a [`ClientConfig`].
    pub fn build(&self) -> Result<ClientConfig, ConfigError> {
        let sp_code = self
            .sp_code
            .clone()
            .ok_or(ConfigError::Missing("sp_code"))?;
        if sp_code.len() != 6 || !sp_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidSpCode(sp_code));
        }

        let gateway_username = self
            .gateway_username
            .clone()
            .ok_or(ConfigError::Missing("gateway_username"))?;
        let gateway_password = self
            .gateway_password
            .clone()
            .ok_or(ConfigError::Missing("gateway_password"))?;
        let service_id = self
            .service_id
            .clone()
            .ok_or(ConfigError::Missing("service_id"))?;

        Ok(ClientConfig {
            sp_code,
            gateway_username,
            gateway_password,
            gateway_signature: self.gateway_signature.clone().unwrap_or_default(),
            service_id,
            disable_long_message: self.disable_long_message,
            send_long_message_as_short_messages: self.send_long_message_as_short_messages,
            prepositive_gateway_signature: self.prepositive_gateway_signature,
            attempt_remove_signature: self.attempt_remove_signature,
            fee_type: self.fee_type.clone().unwrap_or_else(|| "02".to_owned()),
            fee_code: self.fee_code.clone().unwrap_or_else(|| "05".to_owned()),
        })
    }
}
