//! Per-op handlers: each reputation op is decoded and forwarded to the
//! crate that owns it (spec §4.1: "Each op has a handler exposed by C2 or a
//! helper module").

use wot_dispute::DisputeManager;
use wot_storage::Database;
use wot_trust_graph::{BondedVote, TrustGraph};
use wot_types::op_return::{self, DaoVotePayload, OpCode};
use wot_types::{BlockHeight, Timestamp, Transaction};

use crate::error::OpError;

/// The address this op is attributed to: the first address whose UTXOs the
/// transaction spends (spec has no explicit "sender" field on these
/// payloads; see DESIGN.md "op sender attribution").
fn sender_of(tx: &Transaction) -> Result<wot_types::Address, OpError> {
    tx.input_addresses.first().copied().ok_or(OpError::NoSender)
}

/// What a successfully-applied op touched, so the dispatcher can drive
/// post-mutation anomaly observation (spec §4.1: "triggers the anomaly
/// detector (C10)") without re-decoding the payload itself.
#[derive(Debug, Clone, Copy)]
pub enum AppliedOp {
    /// `TRUST_EDGE`: the trustee's global reputation may have moved.
    TrustEdge { to: wot_types::Address },
    /// `BONDED_VOTE` / legacy `VOTE`: `voter` cast `value` on `target`.
    Vote {
        voter: wot_types::Address,
        target: wot_types::Address,
        value: i16,
    },
    /// `DAO_DISPUTE` / `DAO_VOTE`: dispute lifecycle events have no
    /// reputation/voting-anomaly hook under spec §4.10.
    Dispute,
}

/// Outcome of routing one decoded `OP_RETURN` output.
pub enum HandleOutcome {
    Applied(AppliedOp),
    /// Recognized but out of this core's scope (`CVM_DEPLOY`/`CVM_CALL`,
    /// consumed by the VM).
    OutOfScope,
}

/// Route one decoded `OP_RETURN` output to its handler.
#[allow(clippy::too_many_arguments)]
pub fn handle_output<D: Database>(
    output: &[u8],
    tx: &Transaction,
    height: BlockHeight,
    now: Timestamp,
    trust_graph: &TrustGraph<D>,
    dispute_manager: &DisputeManager<D>,
    dispute_config: &wot_config::DisputeConfig,
) -> Result<HandleOutcome, OpError> {
    let (op, body) = op_return::split_header(output)?;
    match op {
        OpCode::TrustEdge => {
            let payload = op_return::decode_trust_edge(body)?;
            trust_graph.add_trust_edge(
                payload.from,
                payload.to,
                payload.weight,
                payload.bond,
                tx.hash,
                now,
                payload.reason,
            )?;
            Ok(HandleOutcome::Applied(AppliedOp::TrustEdge { to: payload.to }))
        }
        OpCode::BondedVote => {
            let payload = op_return::decode_bonded_vote(body)?;
            let voter = sender_of(tx)?;
            trust_graph.record_bonded_vote(BondedVote {
                voter,
                target: payload.target,
                value: payload.value,
                bond: payload.bond,
                bond_tx: tx.hash,
                ts: now,
                slashed: false,
                slash_tx: None,
                reason: payload.reason,
            })?;
            Ok(HandleOutcome::Applied(AppliedOp::Vote {
                voter,
                target: payload.target,
                value: payload.value,
            }))
        }
        OpCode::Vote => {
            // Legacy unbonded vote: recorded through the same bonded-vote
            // path with `bond = 0`. Subject to the same `min_bond`
            // enforcement as `BONDED_VOTE` — "unbonded" describes how the
            // sender funded it, not an exemption from the graph's floor.
            let payload = op_return::decode_vote(body)?;
            let voter = sender_of(tx)?;
            trust_graph.record_bonded_vote(BondedVote {
                voter,
                target: payload.target,
                value: payload.value,
                bond: 0,
                bond_tx: tx.hash,
                ts: now,
                slashed: false,
                slash_tx: None,
                reason: payload.reason,
            })?;
            Ok(HandleOutcome::Applied(AppliedOp::Vote {
                voter,
                target: payload.target,
                value: payload.value,
            }))
        }
        OpCode::DaoDispute => {
            let payload = op_return::decode_dao_dispute(body)?;
            let challenger = sender_of(tx)?;
            trust_graph.create_dispute(
                tx.hash,
                payload.disputed_vote_tx,
                challenger,
                payload.bond,
                payload.reason,
                now,
                height,
                dispute_config.commit_phase_duration,
                dispute_config.reveal_phase_duration,
                payload.use_commit_reveal,
            )?;
            Ok(HandleOutcome::Applied(AppliedOp::Dispute))
        }
        OpCode::DaoVote => {
            let payload = op_return::decode_dao_vote(body)?;
            let voter = sender_of(tx)?;
            match payload {
                DaoVotePayload::Commit { dispute, hash, stake } => {
                    dispute_manager.submit_commitment(trust_graph, dispute, voter, hash, stake, height)?;
                }
                DaoVotePayload::Reveal { dispute, vote, nonce } => {
                    dispute_manager.reveal_vote(trust_graph, dispute, voter, vote, nonce, height)?;
                }
            }
            Ok(HandleOutcome::Applied(AppliedOp::Dispute))
        }
        OpCode::CvmDeploy | OpCode::CvmCall => Ok(HandleOutcome::OutOfScope),
    }
}

#[cfg(test)]
mod tests {
    use wot_config::{DisputeConfig, TrustGraphConfig};
    use wot_storage::backends::hashmap::HashMapBackend;
    use wot_types::op_return::PROTOCOL_MAGIC;
    use wot_types::Address;

    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    fn tx_with(hash_byte: u8, inputs: Vec<Address>, output: Vec<u8>) -> Transaction {
        let mut hash = wot_types::TxHash::zero();
        hash.0[0] = hash_byte;
        Transaction {
            hash,
            input_addresses: inputs,
            op_return_outputs: vec![output],
            is_coinbase: false,
        }
    }

    fn trust_edge_output(from: Address, to: Address, weight: i16, bond: i64, reason: &str) -> Vec<u8> {
        let mut out = PROTOCOL_MAGIC.to_vec();
        out.push(OpCode::TrustEdge as u8);
        out.extend_from_slice(&from.0);
        out.extend_from_slice(&to.0);
        out.extend_from_slice(&weight.to_le_bytes());
        out.extend_from_slice(&bond.to_le_bytes());
        out.push(reason.len() as u8);
        out.extend_from_slice(reason.as_bytes());
        out
    }

    fn bonded_vote_output(target: Address, value: i16, bond: i64, reason: &str) -> Vec<u8> {
        let mut out = PROTOCOL_MAGIC.to_vec();
        out.push(OpCode::BondedVote as u8);
        out.extend_from_slice(&target.0);
        out.extend_from_slice(&value.to_le_bytes());
        out.extend_from_slice(&bond.to_le_bytes());
        out.push(reason.len() as u8);
        out.extend_from_slice(reason.as_bytes());
        out
    }

    fn setup() -> (TrustGraph<HashMapBackend>, DisputeManager<HashMapBackend>, DisputeConfig) {
        let trust_graph =
            TrustGraph::load(std::sync::Arc::new(HashMapBackend::new()), TrustGraphConfig::default()).unwrap();
        let dispute_manager =
            DisputeManager::load(std::sync::Arc::new(HashMapBackend::new()), DisputeConfig::default()).unwrap();
        (trust_graph, dispute_manager, DisputeConfig::default())
    }

    #[test]
    fn trust_edge_op_applies_to_the_graph() {
        let (trust_graph, dispute_manager, config) = setup();
        let output = trust_edge_output(addr(1), addr(2), 80, trust_graph.min_bond(80), "hi");
        let tx = tx_with(1, vec![], output);

        let outcome = handle_output(&tx.op_return_outputs[0], &tx, 10, 100, &trust_graph, &dispute_manager, &config)
            .unwrap();
        assert!(matches!(outcome, HandleOutcome::Applied(AppliedOp::TrustEdge { to }) if to == addr(2)));
        assert_eq!(trust_graph.get_trust_edge(addr(1), addr(2)).unwrap().weight, 80);
    }

    #[test]
    fn bonded_vote_op_attributes_to_first_input_address() {
        let (trust_graph, dispute_manager, config) = setup();
        let bond = trust_graph.min_bond(50);
        let output = bonded_vote_output(addr(2), 50, bond, "r");
        let tx = tx_with(1, vec![addr(9), addr(8)], output);

        handle_output(&tx.op_return_outputs[0], &tx, 10, 100, &trust_graph, &dispute_manager, &config).unwrap();
        let vote = trust_graph.get_vote(tx.hash).unwrap();
        assert_eq!(vote.voter, addr(9));
        assert_eq!(vote.target, addr(2));
    }

    #[test]
    fn bonded_vote_op_without_any_input_is_isolated() {
        let (trust_graph, dispute_manager, config) = setup();
        let bond = trust_graph.min_bond(50);
        let output = bonded_vote_output(addr(2), 50, bond, "r");
        let tx = tx_with(1, vec![], output);

        let err =
            handle_output(&tx.op_return_outputs[0], &tx, 10, 100, &trust_graph, &dispute_manager, &config)
                .unwrap_err();
        assert!(matches!(err, OpError::NoSender));
    }

    #[test]
    fn malformed_payload_is_isolated_not_panicking() {
        let (trust_graph, dispute_manager, config) = setup();
        let mut output = PROTOCOL_MAGIC.to_vec();
        output.push(OpCode::TrustEdge as u8);
        output.extend_from_slice(&[0u8; 4]); // far too short a body
        let tx = tx_with(1, vec![], output);

        let err =
            handle_output(&tx.op_return_outputs[0], &tx, 10, 100, &trust_graph, &dispute_manager, &config)
                .unwrap_err();
        assert!(matches!(err, OpError::Malformed(_)));
    }

    #[test]
    fn deploy_and_call_ops_are_out_of_scope() {
        let (trust_graph, dispute_manager, config) = setup();
        let mut out = PROTOCOL_MAGIC.to_vec();
        out.push(OpCode::CvmDeploy as u8);
        out.extend_from_slice(b"bytecode");
        let tx = tx_with(1, vec![], out);

        let outcome =
            handle_output(&tx.op_return_outputs[0], &tx, 10, 100, &trust_graph, &dispute_manager, &config)
                .unwrap();
        assert!(matches!(outcome, HandleOutcome::OutOfScope));
    }
}
