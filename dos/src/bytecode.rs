//! Malicious-bytecode static analysis over contract deploy payloads (spec
//! §4.8). Opcode values follow the widely used EVM-style byte assignment
//! (`CVM_DEPLOY`/`CVM_CALL` payloads, spec §6), since the core only inspects
//! shape, never executes the bytecode (out of scope, spec §1).

use serde::{Deserialize, Serialize};

const JUMP: u8 = 0x56;
const JUMPI: u8 = 0x57;
const JUMPDEST: u8 = 0x5B;
const GAS: u8 = 0x5A;
const SLOAD: u8 = 0x54;
const SSTORE: u8 = 0x55;
const CALL: u8 = 0xF1;
const SHA3: u8 = 0x20;
const CREATE: u8 = 0xF0;
const SELFDESTRUCT: u8 = 0xFF;

const SELFDESTRUCT_SEVERITY: f64 = 0.9;
const REENTRANCY_SEVERITY: f64 = 0.5;
const UNBOUNDED_LOOP_SEVERITY: f64 = 0.4;
const RESOURCE_EXHAUSTION_SEVERITY: f64 = 0.3;

const EXPENSIVE_OP_DENSITY_THRESHOLD: f64 = 0.10;
const LOOP_COUNT_THRESHOLD: usize = 5;

/// Outcome of [`analyze`]: which indicators fired and the aggregate score
/// they combine into.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BytecodeRisk {
    pub selfdestruct_present: bool,
    pub reentrancy_indicator: bool,
    pub unbounded_loop_indicator: bool,
    pub resource_exhaustion_indicator: bool,
    pub risk_score: f64,
}

/// `CALL` immediately or shortly followed by `SSTORE` before any `SLOAD`
/// reset the pattern — the state-after-external-call shape of a reentrancy
/// bug (spec §4.8).
fn has_reentrancy_pattern(code: &[u8]) -> bool {
    let mut seen_call = false;
    for &op in code {
        match op {
            CALL => seen_call = true,
            SSTORE if seen_call => return true,
            SLOAD => seen_call = false,
            _ => {}
        }
    }
    false
}

/// A backward jump (`JUMP`/`JUMPI` back to an already-seen `JUMPDEST`) with
/// no `GAS` opcode observed since that `JUMPDEST` — no metering checkpoint
/// inside the loop body (spec §4.8).
fn has_unbounded_loop_pattern(code: &[u8]) -> bool {
    let mut seen_jumpdest = false;
    let mut gas_since_jumpdest = false;
    for &op in code {
        match op {
            JUMPDEST => {
                seen_jumpdest = true;
                gas_since_jumpdest = false;
            }
            GAS => gas_since_jumpdest = true,
            JUMP | JUMPI => {
                if seen_jumpdest && !gas_since_jumpdest {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn is_expensive(op: u8) -> bool {
    matches!(op, SSTORE | SLOAD | CALL | CREATE | SHA3)
}

fn loop_count(code: &[u8]) -> usize {
    code.iter().filter(|&&op| op == JUMPDEST).count()
}

/// `risk_score` ∈ [0,1]: static analysis over a deploy payload's bytecode
/// (spec §4.8). Severities of fired indicators are summed and clamped;
/// `SELFDESTRUCT` alone already sits at the reject threshold's edge.
pub fn analyze(code: &[u8]) -> BytecodeRisk {
    let selfdestruct_present = code.contains(&SELFDESTRUCT);
    let reentrancy_indicator = has_reentrancy_pattern(code);
    let unbounded_loop_indicator = has_unbounded_loop_pattern(code);

    let expensive_count = code.iter().filter(|&&op| is_expensive(op)).count();
    let density = if code.is_empty() {
        0.0
    } else {
        expensive_count as f64 / code.len() as f64
    };
    let resource_exhaustion_indicator =
        density > EXPENSIVE_OP_DENSITY_THRESHOLD && loop_count(code) > LOOP_COUNT_THRESHOLD;

    let mut risk_score = 0.0;
    if selfdestruct_present {
        risk_score += SELFDESTRUCT_SEVERITY;
    }
    if reentrancy_indicator {
        risk_score += REENTRANCY_SEVERITY;
    }
    if unbounded_loop_indicator {
        risk_score += UNBOUNDED_LOOP_SEVERITY;
    }
    if resource_exhaustion_indicator {
        risk_score += RESOURCE_EXHAUSTION_SEVERITY;
    }

    BytecodeRisk {
        selfdestruct_present,
        reentrancy_indicator,
        unbounded_loop_indicator,
        resource_exhaustion_indicator,
        risk_score: risk_score.min(1.0),
    }
}

/// Whether `risk` clears the configured reject threshold.
pub fn should_reject(risk: &BytecodeRisk, reject_threshold: f64) -> bool {
    risk.risk_score >= reject_threshold
}
