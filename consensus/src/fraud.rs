//! `record_fraud_attempt` / `validate_fraud_record` (spec §4.5) and the
//! append-only `FraudRecord` ledger (spec §3).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use wot_storage::Database;
use wot_types::{Address, Amount, BlockHeight, Timestamp, TxHash};

use crate::error::{ConsensusError, ConsensusResult};
use crate::keys;
use crate::types::FraudRecord;

/// Minimum `|claimed - actual|` for a fraud record to be accepted (spec
/// §4.5: "min score difference"); pinned to `SCORE_TOLERANCE` so a claim
/// that would itself have been accepted can never be recorded as fraud.
pub const MIN_FRAUD_SCORE_DIFFERENCE: i16 = crate::types::SCORE_TOLERANCE;

/// Append-only store of [`FraudRecord`]s, keyed by `(tx, fraudster)` (spec
/// §3, §6 `fraud_{tx}_{fraudster}`).
pub struct FraudLedger<D: Database> {
    db: Arc<D>,
    records: RwLock<HashMap<(TxHash, Address), FraudRecord>>,
}

impl<D: Database> FraudLedger<D> {
    /// Build a ledger backed by `db`, replaying persisted records.
    pub fn load(db: Arc<D>) -> ConsensusResult<Self> {
        let ledger = FraudLedger {
            db,
            records: RwLock::new(HashMap::new()),
        };
        ledger.reload()?;
        Ok(ledger)
    }

    fn reload(&self) -> ConsensusResult<()> {
        for (key, value) in self.db.list_prefix(&keys::fraud_prefix())? {
            let record: FraudRecord = bincode::deserialize(&value).map_err(|e| ConsensusError::Decode {
                key: String::from_utf8_lossy(&key).into_owned(),
                msg: e.to_string(),
            })?;
            self.records.write().insert((record.tx, record.fraudster), record);
        }
        Ok(())
    }

    fn persist(&self, record: &FraudRecord) -> ConsensusResult<()> {
        let bytes = bincode::serialize(record).expect("FraudRecord is always serializable");
        self.db.write(&keys::fraud_key(&record.tx, &record.fraudster), bytes)?;
        Ok(())
    }

    /// Fetch a single fraud record, if any.
    pub fn get(&self, tx: TxHash, fraudster: Address) -> Option<FraudRecord> {
        self.records.read().get(&(tx, fraudster)).cloned()
    }

    /// `validate_fraud_record` (spec §4.5): the score difference must clear
    /// the tolerance, the responder set that produced it must not have been
    /// flagged as a coordinated Sybil cluster (spec §4.5 "Anti-Sybil on
    /// responses"; here that check has already been run by the caller over
    /// the tally's responders and is passed in as `responders_flagged_sybil`,
    /// rather than re-derived from the ledger — see DESIGN.md), and no
    /// record may already exist for this `(tx, fraudster)` pair.
    fn validate(
        &self,
        tx: TxHash,
        fraudster: Address,
        claimed_score: i16,
        actual_score: i16,
        responders_flagged_sybil: bool,
    ) -> ConsensusResult<()> {
        if self.records.read().contains_key(&(tx, fraudster)) {
            return Err(ConsensusError::DuplicateFraudRecord(tx, fraudster));
        }
        if (claimed_score - actual_score).abs() <= MIN_FRAUD_SCORE_DIFFERENCE {
            return Err(ConsensusError::FraudRecordRejected(
                tx,
                fraudster,
                "score difference within tolerance",
            ));
        }
        if responders_flagged_sybil {
            return Err(ConsensusError::FraudRecordRejected(
                tx,
                fraudster,
                "responder set flagged as coordinated Sybil cluster",
            ));
        }
        Ok(())
    }

    /// `record_fraud_attempt` (spec §4.5 step 7): append a [`FraudRecord`]
    /// once it passes [`FraudLedger::validate`].
    #[allow(clippy::too_many_arguments)]
    pub fn record_fraud_attempt(
        &self,
        tx: TxHash,
        fraudster: Address,
        claimed_score: i16,
        actual_score: i16,
        ts: Timestamp,
        block_height: BlockHeight,
        reputation_penalty: i16,
        bond_slashed: Amount,
        responders_flagged_sybil: bool,
    ) -> ConsensusResult<FraudRecord> {
        self.validate(tx, fraudster, claimed_score, actual_score, responders_flagged_sybil)?;
        let record = FraudRecord {
            tx,
            fraudster,
            claimed_score,
            actual_score,
            score_difference: (claimed_score - actual_score).abs(),
            ts,
            block_height,
            reputation_penalty,
            bond_slashed,
        };
        self.persist(&record)?;
        self.records.write().insert((tx, fraudster), record.clone());
        warn!(
            "fraud recorded: tx={} fraudster={} claimed={} actual={} penalty={}",
            tx, fraudster, claimed_score, actual_score, reputation_penalty
        );
        Ok(record)
    }
}
