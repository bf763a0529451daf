//! encrypted payment history (C12, spec.md 4.8, 6)

use std::collections::BTreeMap;

use circles_crypto::{Hash32, SealKey};

use crate::collection::EncryptedPaymentRecord;
use crate::error::PaymentError;

#[derive(Clone, Debug, Default)]
pub struct PaymentHistory {
    records: BTreeMap<Hash32, Vec<EncryptedPaymentRecord>>,
}

#[derive(Clone, Debug)]
pub enum HistoryView {
    Encrypted(Vec<EncryptedPaymentRecord>),
    Decrypted { total_payments: usize, total_amount: u128, average_anonymity_score: u32, records: Vec<EncryptedPaymentRecord> },
}

impl PaymentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, contributor: Hash32, record: EncryptedPaymentRecord) {
        self.records.entry(contributor).or_default().push(record);
    }

    /// `history(ic, decrypt_key?)` (spec.md 4.8, 6). without a key, the
    /// caller only ever sees opaque ciphertexts.
    pub fn history(&self, contributor: &Hash32, decrypt_key: Option<&SealKey>) -> Result<HistoryView, PaymentError> {
        let records = self.records.get(contributor).cloned().unwrap_or_default();
        let Some(key) = decrypt_key else {
            return Ok(HistoryView::Encrypted(records));
        };

        let mut total_amount: u128 = 0;
        let mut score_sum: u64 = 0;
        for record in &records {
            let plaintext = circles_crypto::open(key, &record.ciphertext_amount);
            let mut bytes = [0u8; 16];
            if plaintext.len() != 16 {
                return Err(PaymentError::DecryptionFailed(record.record_id));
            }
            bytes.copy_from_slice(&plaintext);
            total_amount = total_amount.saturating_add(u128::from_le_bytes(bytes));
            score_sum += record.anonymity_score as u64;
        }
        let average_anonymity_score = if records.is_empty() { 0 } else { (score_sum / records.len() as u64) as u32 };

        Ok(HistoryView::Decrypted {
            total_payments: records.len(),
            total_amount,
            average_anonymity_score,
            records,
        })
    }
}
