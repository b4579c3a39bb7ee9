pub mod client;
pub mod image;
pub mod story;
pub mod types;

pub use client::GeminiHttpClient;
pub use image::GeminiIllustrationClient;
pub use story::GeminiStoryClient;

#[cfg(test)]
macro_rules! impl_with_gemini_base_url {
    ($client:ty) => {
        impl $client {
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }
        }
    };
}

#[cfg(test)]
pub(crate) use impl_with_gemini_base_url;
