use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Reset the output, then fetch, transcode and append each place id in
    /// order. The first error stops the run; records already appended stay.
    pub async fn run(&self, place_ids: &[String]) -> Result<String> {
        tracing::info!("Starting place dump for {} place id(s)", place_ids.len());

        self.pipeline.prepare().await?;

        let mut output_path = String::new();
        for (index, place_id) in place_ids.iter().enumerate() {
            tracing::info!("[{}/{}] Fetching {}", index + 1, place_ids.len(), place_id);

            let body = self.pipeline.extract(place_id).await?;
            let result = self.pipeline.transform(body).await?;
            output_path = self.pipeline.load(result).await?;
        }

        tracing::info!("Wrote {} record(s) to {}", place_ids.len(), output_path);
        Ok(output_path)
    }
}
