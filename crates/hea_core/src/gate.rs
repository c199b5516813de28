//! Quantum gate definitions for HEA
//!
//! Gantree: L1_Circuit → Gate
//!
//! Gate enum covering the rotations and couplings a hardware-efficient
//! ansatz is built from, plus the option enums that select them.

use crate::constants::ansatz::{ROTATION_PAIR_PARAMS, UNITARY_PARAMS};
use crate::error::HeaError;
use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quantum gate enumeration
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================
    /// Hadamard gate
    /// Gantree: H(QubitId) // 하다마드
    H(QubitId),

    /// Pauli-X gate (NOT)
    X(QubitId),

    /// Pauli-Y gate
    Y(QubitId),

    /// Pauli-Z gate
    Z(QubitId),

    /// S gate (sqrt(Z))
    S(QubitId),

    /// S-dagger gate (inverse of S)
    Sdg(QubitId),

    // ========================================================================
    // Single-Qubit Parameterized Rotation Gates
    // ========================================================================
    /// Rotation around X-axis
    /// Gantree: Rx(QubitId, Angle) // X 회전
    Rx(QubitId, Angle),

    /// Rotation around Y-axis
    /// Gantree: Ry(QubitId, Angle) // Y 회전
    Ry(QubitId, Angle),

    /// Rotation around Z-axis
    /// Gantree: Rz(QubitId, Angle) // Z 회전
    Rz(QubitId, Angle),

    /// General single-qubit rotation U(θ, φ, λ)
    /// Gantree: U(QubitId, θ, φ, λ) // 일반 회전
    U(QubitId, Angle, Angle, Angle),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (CX)
    /// Gantree: CNOT(QubitId, QubitId) // ctrl, tgt
    Cnot(QubitId, QubitId),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    /// SWAP gate
    Swap(QubitId, QubitId),

    // ========================================================================
    // Measurement and Control
    // ========================================================================
    /// Single qubit measurement
    Measure(QubitId),

    /// Measure all qubits (convenience)
    /// Gantree: MeasureAll // 전체 측정
    MeasureAll,

    /// Barrier (for visualization)
    Barrier(Vec<QubitId>),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::U(q, _, _, _)
            | Gate::Measure(q) => vec![*q],

            Gate::Cnot(c, t) | Gate::Cz(c, t) | Gate::Swap(c, t) => vec![*c, *t],

            Gate::MeasureAll => vec![], // Applied to all qubits
            Gate::Barrier(qs) => qs.clone(),
        }
    }

    /// Check if gate is single-qubit (unitary, measurement excluded)
    /// Gantree: is_single_qubit(&self) -> bool // 1Q 판별
    pub fn is_single_qubit(&self) -> bool {
        matches!(
            self,
            Gate::H(_)
                | Gate::X(_)
                | Gate::Y(_)
                | Gate::Z(_)
                | Gate::S(_)
                | Gate::Sdg(_)
                | Gate::Rx(_, _)
                | Gate::Ry(_, _)
                | Gate::Rz(_, _)
                | Gate::U(_, _, _, _)
        )
    }

    /// Check if gate is two-qubit
    /// Gantree: is_two_qubit(&self) -> bool // 2Q 판별
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Gate::Cnot(_, _) | Gate::Cz(_, _) | Gate::Swap(_, _))
    }

    /// Check if gate is parameterized
    /// Gantree: is_parameterized(&self) -> bool // 파라미터 여부
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            Gate::Rx(_, _) | Gate::Ry(_, _) | Gate::Rz(_, _) | Gate::U(_, _, _, _)
        )
    }

    /// Angles carried by the gate, in QASM argument order
    pub fn angles(&self) -> Vec<Angle> {
        match self {
            Gate::Rx(_, a) | Gate::Ry(_, a) | Gate::Rz(_, a) => vec![*a],
            Gate::U(_, theta, phi, lambda) => vec![*theta, *phi, *lambda],
            _ => vec![],
        }
    }

    /// Check if gate is measurement
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure(_) | Gate::MeasureAll)
    }

    /// Check if gate is a barrier
    pub fn is_barrier(&self) -> bool {
        matches!(self, Gate::Barrier(_))
    }

    /// Get gate name
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::Rx(_, _) => "rx",
            Gate::Ry(_, _) => "ry",
            Gate::Rz(_, _) => "rz",
            Gate::U(_, _, _, _) => "u",
            Gate::Cnot(_, _) => "cx",
            Gate::Cz(_, _) => "cz",
            Gate::Swap(_, _) => "swap",
            Gate::Measure(_) | Gate::MeasureAll => "measure",
            Gate::Barrier(_) => "barrier",
        }
    }

    /// Convert to OpenQASM 2.0 string
    /// Gantree: to_qasm(&self) -> String // QASM 변환
    pub fn to_qasm(&self) -> String {
        match self {
            Gate::H(q) => format!("h q[{}];", q),
            Gate::X(q) => format!("x q[{}];", q),
            Gate::Y(q) => format!("y q[{}];", q),
            Gate::Z(q) => format!("z q[{}];", q),
            Gate::S(q) => format!("s q[{}];", q),
            Gate::Sdg(q) => format!("sdg q[{}];", q),

            Gate::Rx(q, theta) => format!("rx({}) q[{}];", theta, q),
            Gate::Ry(q, theta) => format!("ry({}) q[{}];", theta, q),
            Gate::Rz(q, theta) => format!("rz({}) q[{}];", theta, q),
            Gate::U(q, theta, phi, lambda) => {
                format!("u({},{},{}) q[{}];", theta, phi, lambda, q)
            }

            Gate::Cnot(c, t) => format!("cx q[{}],q[{}];", c, t),
            Gate::Cz(c, t) => format!("cz q[{}],q[{}];", c, t),
            Gate::Swap(a, b) => format!("swap q[{}],q[{}];", a, b),

            Gate::Measure(q) => format!("measure q[{}] -> c[{}];", q, q),
            Gate::MeasureAll => "measure q -> c;".to_string(),
            Gate::Barrier(qs) => {
                if qs.is_empty() {
                    "barrier q;".to_string()
                } else {
                    let qubits: Vec<String> = qs.iter().map(|q| format!("q[{}]", q)).collect();
                    format!("barrier {};", qubits.join(","))
                }
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_qasm())
    }
}

// ============================================================================
// Gate Family
// ============================================================================

/// Single-qubit gate family used by every layer of an ansatz
/// Gantree: GateFamily // 게이트 계열
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GateFamily {
    /// Ry(θ_y) followed by Rz(θ_z) on each qubit
    RotationPair,
    /// General U(θ, φ, λ) on each qubit
    #[default]
    UnitaryThree,
}

impl GateFamily {
    /// Free parameters each qubit consumes per layer
    /// Gantree: params_per_qubit() -> usize // 큐비트당 파라미터
    pub fn params_per_qubit(&self) -> usize {
        match self {
            GateFamily::RotationPair => ROTATION_PAIR_PARAMS,
            GateFamily::UnitaryThree => UNITARY_PARAMS,
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ryrz" | "ry_rz" | "rotation_pair" => Some(GateFamily::RotationPair),
            "u3" | "u" | "unitary_three" => Some(GateFamily::UnitaryThree),
            _ => None,
        }
    }
}

impl FromStr for GateFamily {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| HeaError::UnknownOption {
            kind: "gate family",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for GateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateFamily::RotationPair => write!(f, "RYRZ"),
            GateFamily::UnitaryThree => write!(f, "U3"),
        }
    }
}

// ============================================================================
// Entanglement
// ============================================================================

/// Which qubit pairs receive a coupling gate within a layer
/// Gantree: Entanglement // 얽힘 패턴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Entanglement {
    /// Nearest neighbours (k, k+1)
    #[default]
    Linear,
    /// Every pair (k, p) with k < p
    Full,
}

impl Entanglement {
    /// Coupling pairs (control, target) for `num_qubits` qubits, in gate order
    /// Gantree: pairs(n) -> Vec<(q,q)> // 결합 쌍
    pub fn pairs(&self, num_qubits: usize) -> Vec<(QubitId, QubitId)> {
        match self {
            Entanglement::Linear => (1..num_qubits).map(|k| (k - 1, k)).collect(),
            Entanglement::Full => (0..num_qubits)
                .flat_map(|k| ((k + 1)..num_qubits).map(move |p| (k, p)))
                .collect(),
        }
    }

    /// Create coupling gate for given qubit pair
    pub fn gate(&self, control: QubitId, target: QubitId) -> Gate {
        Gate::Cnot(control, target)
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(Entanglement::Linear),
            "full" => Some(Entanglement::Full),
            _ => None,
        }
    }
}

impl FromStr for Entanglement {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| HeaError::UnknownOption {
            kind: "entanglement",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for Entanglement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entanglement::Linear => write!(f, "Linear"),
            Entanglement::Full => write!(f, "Full"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
