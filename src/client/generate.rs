use super::core::{GenerationOutcome, TextGenerationClient};
use super::stream::TextGenerationStream;
use crate::protocol::GenerationParameters;
use crate::types::TextGenerationOutput;
use crate::Result;

/// Builder for generation requests.
///
/// ```rust,no_run
/// # async fn run(client: &tgi_client_rust::TextGenerationClient) -> tgi_client_rust::Result<()> {
/// let output = client
///     .text_generation("What is Deep Learning?")
///     .max_new_tokens(20)
///     .details(true)
///     .execute()
///     .await?;
/// println!("{}", output.text());
/// # Ok(())
/// # }
/// ```
pub struct TextGenerationBuilder<'a> {
    pub(crate) client: &'a TextGenerationClient,
    pub(crate) inputs: String,
    pub(crate) parameters: GenerationParameters,
}

impl<'a> TextGenerationBuilder<'a> {
    pub(crate) fn new(client: &'a TextGenerationClient, inputs: String) -> Self {
        Self {
            client,
            inputs,
            parameters: GenerationParameters::default(),
        }
    }

    /// Replace all parameters at once.
    pub fn parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn max_new_tokens(mut self, n: u32) -> Self {
        self.parameters.max_new_tokens = Some(n);
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.parameters.temperature = Some(temp);
        self
    }

    pub fn top_p(mut self, p: f64) -> Self {
        self.parameters.top_p = Some(p);
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.parameters.top_k = Some(k);
        self
    }

    pub fn do_sample(mut self, enable: bool) -> Self {
        self.parameters.do_sample = enable;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.parameters.seed = Some(seed);
        self
    }

    pub fn stop(mut self, sequences: Vec<String>) -> Self {
        self.parameters.stop = sequences;
        self
    }

    pub fn details(mut self, enable: bool) -> Self {
        self.parameters.details = enable;
        self
    }

    pub fn watermark(mut self, enable: bool) -> Self {
        self.parameters.watermark = enable;
        self
    }

    fn into_parts(self) -> (&'a TextGenerationClient, String, Option<GenerationParameters>) {
        let parameters = (!self.parameters.is_empty()).then_some(self.parameters);
        (self.client, self.inputs, parameters)
    }

    /// Execute as a single-shot call.
    pub async fn execute(self) -> Result<TextGenerationOutput> {
        let (client, inputs, parameters) = self.into_parts();
        client.generate_text(&inputs, parameters).await
    }

    /// Execute as a streamed call.
    pub async fn execute_stream(self) -> Result<TextGenerationStream> {
        let (client, inputs, parameters) = self.into_parts();
        client.generate_stream(&inputs, parameters).await
    }

    /// Execute with an explicit stream flag.
    pub async fn send(self, stream: bool) -> Result<GenerationOutcome> {
        let (client, inputs, parameters) = self.into_parts();
        client.generate(&inputs, parameters, stream).await
    }
}
