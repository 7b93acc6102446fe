//! Firewall service: a long-lived actor owning the signature table.
//!
//! Requests arrive on an mpsc mailbox and carry a oneshot reply address;
//! the reply echoes the scanned data alongside the pass verdict. The
//! table is loaded once from the [`SignatureSource`] and never mutated.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{find_match, ScanSignature, ScanTarget};
use crate::ports::SignatureSource;

/// A scan request: the item kind, its payload, and the reply address.
#[derive(Debug)]
pub struct ScanRequest {
    target: ScanTarget,
    data: Vec<u8>,
    reply: oneshot::Sender<ScanVerdict>,
}

/// The scanner's reply: the scanned data and whether it passed.
#[derive(Debug)]
pub struct ScanVerdict {
    /// The payload that was scanned, returned to the requester.
    pub data: Vec<u8>,
    /// True iff the item may proceed.
    pub passed: bool,
}

/// Cheap cloneable handle other subsystems hold.
#[derive(Clone, Debug)]
pub struct FirewallHandle {
    tx: mpsc::UnboundedSender<ScanRequest>,
}

impl FirewallHandle {
    /// Scans `data` as a `target`-kind item. Returns the pass verdict.
    ///
    /// Fails closed if the scanner is gone.
    pub async fn scan(&self, target: ScanTarget, data: Vec<u8>) -> bool {
        let (reply, verdict) = oneshot::channel();
        let request = ScanRequest {
            target,
            data,
            reply,
        };
        if self.tx.send(request).is_err() {
            warn!("firewall unavailable; failing closed");
            return false;
        }
        match verdict.await {
            Ok(verdict) => verdict.passed,
            Err(_) => {
                warn!("firewall dropped a scan request; failing closed");
                false
            }
        }
    }
}

/// The firewall actor.
pub struct FirewallService {
    signatures: Vec<ScanSignature>,
    rx: mpsc::UnboundedReceiver<ScanRequest>,
}

impl FirewallService {
    /// Loads the signature table and spawns the scanner task.
    pub fn spawn(source: &dyn SignatureSource) -> FirewallHandle {
        let signatures = source.all();
        info!(signatures = signatures.len(), "firewall loaded");

        let (tx, rx) = mpsc::unbounded_channel();
        let service = Self { signatures, rx };
        tokio::spawn(service.run());
        FirewallHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let passed = self.scan(request.target, &request.data);
            let verdict = ScanVerdict {
                data: request.data,
                passed,
            };
            // A requester that went away is its own problem.
            let _ = request.reply.send(verdict);
        }
        debug!("firewall mailbox closed; scanner stopping");
    }

    fn scan(&self, target: ScanTarget, data: &[u8]) -> bool {
        match target {
            ScanTarget::Block => true,
            ScanTarget::Tx => match find_match(data, &self.signatures) {
                Some(signature) => {
                    info!(signature = %signature.name, "payload flagged");
                    false
                }
                None => true,
            },
            ScanTarget::Unknown => {
                warn!("scan request with unknown kind; failing closed");
                false
            }
        }
    }
}
