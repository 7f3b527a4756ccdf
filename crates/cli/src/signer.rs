// Path: crates/cli/src/signer.rs

//! A [`CallSigner`] that hands each unsigned call to the operator.
//!
//! The unsigned bytes are printed as base64; the operator signs them with the
//! wallet of their choice and pastes the signed bytes back, also as base64. An
//! empty line (or end of input) declines the request.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use credchain_api::signer::CallSigner;
use credchain_types::app::SignedCallBytes;
use credchain_types::error::CredentialError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin};
use tokio::sync::Mutex;

fn io_rejected(e: std::io::Error) -> CredentialError {
    CredentialError::SigningRejected(format!("signer i/o failed: {}", e))
}

/// Prompts on `output` and reads signed calls from `input`, one line per call.
pub struct PromptSigner<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl PromptSigner<BufReader<Stdin>, Stderr> {
    /// A signer reading stdin and prompting on stderr, leaving stdout to results.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> PromptSigner<R, W> {
    /// A signer over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Returns the output stream.
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R, W> PromptSigner<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn sign_one(
        &self,
        index: usize,
        total: usize,
        unsigned: &[u8],
    ) -> Result<SignedCallBytes, CredentialError> {
        {
            let mut output = self.output.lock().await;
            let prompt = format!(
                "Unsigned call {}/{} (base64):\n{}\nPaste the signed call (base64), or an empty line to decline:\n",
                index + 1,
                total,
                B64.encode(unsigned)
            );
            output.write_all(prompt.as_bytes()).await.map_err(io_rejected)?;
            output.flush().await.map_err(io_rejected)?;
        }

        let mut line = String::new();
        self.input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(io_rejected)?;
        let answer = line.trim();
        if answer.is_empty() {
            return Err(CredentialError::SigningRejected(
                "operator declined to sign".into(),
            ));
        }
        let signed = B64.decode(answer).map_err(|e| {
            CredentialError::SigningRejected(format!("signed call is not valid base64: {}", e))
        })?;
        Ok(SignedCallBytes(signed))
    }
}

#[async_trait]
impl<R, W> CallSigner for PromptSigner<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn sign(&self, unsigned: Vec<Vec<u8>>) -> Result<Vec<SignedCallBytes>, CredentialError> {
        let total = unsigned.len();
        let mut signed = Vec::with_capacity(total);
        for (index, payload) in unsigned.iter().enumerate() {
            signed.push(self.sign_one(index, total, payload).await?);
        }
        tracing::debug!(target: "cli", count = signed.len(), "operator signed calls");
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prints_unsigned_and_reads_signed() {
        let signer = PromptSigner::new(&b"AQID\n"[..], Vec::new());
        let signed = signer.sign(vec![vec![9, 9]]).await.unwrap();
        assert_eq!(signed, vec![SignedCallBytes(vec![1, 2, 3])]);
        let printed = String::from_utf8(signer.into_output()).unwrap();
        assert!(printed.contains("Unsigned call 1/1"));
        assert!(printed.contains("CQk="));
    }

    #[tokio::test]
    async fn test_empty_line_or_eof_declines() {
        for input in [&b"\n"[..], &b""[..]] {
            let signer = PromptSigner::new(input, Vec::new());
            assert!(matches!(
                signer.sign(vec![vec![1]]).await,
                Err(CredentialError::SigningRejected(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_garbage_is_rejected() {
        let signer = PromptSigner::new(&b"not base64!\n"[..], Vec::new());
        assert!(matches!(
            signer.sign(vec![vec![1]]).await,
            Err(CredentialError::SigningRejected(_))
        ));
    }
}
