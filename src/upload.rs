//! Submitting finished cards to the image host.
//!
//! Uploads are fire-and-forget: their outcome is always logged, and additionally reported
//! through a [`PendingUpload`] handle that the host may poll, await, or simply drop.

use futures::channel::oneshot;
use reqwest::multipart::Form;
use tokio::runtime::Handle;
use url::Url;

use crate::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.cloudinary.com/v1_1/tesguerra/upload/";
pub const DEFAULT_PRESET: &str = "mattGradProject";

/// The multipart form a card is uploaded as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadForm {
   /// The encoded card, as a `data:` URL.
   pub file: String,
   pub upload_preset: String,
}

impl UploadForm {
   pub fn new(file: String, upload_preset: &str) -> Self {
      Self { file, upload_preset: upload_preset.to_owned() }
   }

   /// Returns the form's fields, in the order they're sent.
   pub fn fields(&self) -> [(&'static str, &str); 2] {
      [("file", &self.file), ("upload_preset", &self.upload_preset)]
   }

   fn to_multipart(&self) -> Form {
      self.fields()
         .iter()
         .fold(Form::new(), |form, &(name, value)| form.text(name, value.to_owned()))
   }
}

/// The result of an upload: the image host's JSON response, or why the upload failed.
pub type UploadOutcome = crate::Result<serde_json::Value>;

#[derive(Clone, Debug, PartialEq)]
pub enum UploadStatus {
   Pending,
   Uploaded(serde_json::Value),
   Failed(String),
}

impl UploadStatus {
   fn aborted() -> Self {
      Self::Failed(Error::UploadAborted.to_string())
   }
}

impl From<UploadOutcome> for UploadStatus {
   fn from(outcome: UploadOutcome) -> Self {
      match outcome {
         Ok(response) => Self::Uploaded(response),
         Err(error) => Self::Failed(error.to_string()),
      }
   }
}

/// The sending half of an upload's status channel, held by whoever performs the upload.
pub struct UploadReporter {
   sender: oneshot::Sender<UploadOutcome>,
}

impl UploadReporter {
   /// Logs the outcome and forwards it to the [`PendingUpload`], if it's still around.
   pub fn report(self, outcome: UploadOutcome) {
      match &outcome {
         Ok(response) => log::info!("card uploaded: {}", response),
         Err(error) => log::error!("card upload failed: {}", error),
      }
      let _ = self.sender.send(outcome);
   }
}

/// A handle to an upload in progress.
pub struct PendingUpload {
   receiver: oneshot::Receiver<UploadOutcome>,
   status: UploadStatus,
}

impl PendingUpload {
   /// Creates a new status channel.
   pub fn channel() -> (UploadReporter, PendingUpload) {
      let (sender, receiver) = oneshot::channel();
      (
         UploadReporter { sender },
         PendingUpload { receiver, status: UploadStatus::Pending },
      )
   }

   /// Returns the current status of the upload without blocking.
   pub fn status(&mut self) -> &UploadStatus {
      if self.status == UploadStatus::Pending {
         match self.receiver.try_recv() {
            Ok(Some(outcome)) => self.status = outcome.into(),
            Ok(None) => (),
            Err(oneshot::Canceled) => self.status = UploadStatus::aborted(),
         }
      }
      &self.status
   }

   /// Waits for the upload to finish.
   pub async fn finish(mut self) -> UploadStatus {
      if self.status() != &UploadStatus::Pending {
         return self.status;
      }
      match self.receiver.await {
         Ok(outcome) => outcome.into(),
         Err(oneshot::Canceled) => UploadStatus::aborted(),
      }
   }
}

/// Something that can upload cards.
pub trait Uploader {
   /// Starts uploading the form. Must not block.
   fn upload(&self, form: UploadForm) -> PendingUpload;
}

/// Uploads cards over HTTP, as a multipart POST request.
pub struct HttpUploader {
   client: reqwest::Client,
   endpoint: Url,
   runtime: Handle,
}

impl HttpUploader {
   /// Creates an uploader posting to `endpoint`, running requests on the given runtime.
   pub fn new(endpoint: &str, runtime: Handle) -> crate::Result<Self> {
      Ok(Self {
         client: reqwest::Client::builder().build()?,
         endpoint: Url::parse(endpoint)?,
         runtime,
      })
   }

   async fn post(client: reqwest::Client, endpoint: Url, form: UploadForm) -> UploadOutcome {
      let response = client.post(endpoint).multipart(form.to_multipart()).send().await?;
      let status = response.status();
      let body = response.text().await?;
      if !status.is_success() {
         return Err(Error::UploadRejected { status: status.as_u16(), body });
      }
      Ok(serde_json::from_str(&body)?)
   }
}

impl Uploader for HttpUploader {
   fn upload(&self, form: UploadForm) -> PendingUpload {
      let (reporter, pending) = PendingUpload::channel();
      let client = self.client.clone();
      let endpoint = self.endpoint.clone();
      log::info!("uploading card to {}", endpoint);
      self.runtime.spawn(async move {
         reporter.report(Self::post(client, endpoint, form).await);
      });
      pending
   }
}
