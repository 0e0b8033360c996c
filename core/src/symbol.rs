//! Per-window symbol stream: classification, local repair and run-length
//! quantization

use crate::calibrate::CalibrationState;
use log::debug;

/// Classification of one analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Zero,
    One,
    Unknown,
}

impl Symbol {
    pub fn is_resolved(self) -> bool {
        self != Symbol::Unknown
    }

    /// Rounded mean of two resolved symbols; a split rounds half to even,
    /// i.e. to zero
    fn rounded_mean(a: Symbol, b: Symbol) -> Symbol {
        if a == Symbol::One && b == Symbol::One {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }
}

/// Classify each estimate against the calibrated targets
///
/// An estimate within `tolerance_hz` of the one target is `One`, otherwise
/// within `tolerance_hz` of the zero target is `Zero`, otherwise `Unknown`.
pub fn classify(estimates: &[u32], calibration: &CalibrationState, tolerance_hz: f64) -> Vec<Symbol> {
    estimates
        .iter()
        .map(|&estimate| {
            let freq = estimate as f64;
            if (freq - calibration.one_hz).abs() <= tolerance_hz {
                Symbol::One
            } else if (freq - calibration.zero_hz).abs() <= tolerance_hz {
                Symbol::Zero
            } else {
                Symbol::Unknown
            }
        })
        .collect()
}

/// What the corrector changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionStats {
    /// Isolated symbols flipped to match both neighbours
    pub flipped: usize,
    /// Unknown windows filled from the two preceding symbols
    pub interpolated: usize,
    /// Unknown windows removed because they could not be filled
    pub dropped: usize,
}

/// One forward repair pass over the interior of the stream
///
/// Positions `1..len-2` are visited once, in order; the first position and the
/// last two pass through untouched. At each visited position:
/// - a `Zero` between two `One`s becomes `One`, and vice versa;
/// - an `Unknown` whose two preceding (already repaired) symbols are both
///   resolved takes their rounded mean, otherwise it is removed.
///
/// The left neighbour is read from the repaired output, the right neighbour
/// from the input. Clustered errors are not guaranteed to be fixed.
pub fn correct(symbols: &[Symbol]) -> (Vec<Symbol>, CorrectionStats) {
    let len = symbols.len();
    let mut out = Vec::with_capacity(len);
    let mut stats = CorrectionStats::default();

    for (pos, &symbol) in symbols.iter().enumerate() {
        if pos == 0 || pos + 2 >= len {
            out.push(symbol);
            continue;
        }

        let prev = out.last().copied();
        let next = symbols[pos + 1];
        match symbol {
            Symbol::Zero if prev == Some(Symbol::One) && next == Symbol::One => {
                debug!("Window {}: flipped isolated zero to one", pos);
                stats.flipped += 1;
                out.push(Symbol::One);
            }
            Symbol::One if prev == Some(Symbol::Zero) && next == Symbol::Zero => {
                debug!("Window {}: flipped isolated one to zero", pos);
                stats.flipped += 1;
                out.push(Symbol::Zero);
            }
            Symbol::Unknown => match out.as_slice() {
                [.., a, b] if a.is_resolved() && b.is_resolved() => {
                    let filled = Symbol::rounded_mean(*a, *b);
                    debug!("Window {}: filled unknown with {:?}", pos, filled);
                    stats.interpolated += 1;
                    out.push(filled);
                }
                _ => {
                    debug!("Window {}: dropped unresolvable unknown", pos);
                    stats.dropped += 1;
                }
            },
            other => out.push(other),
        }
    }

    (out, stats)
}

/// A run of identical symbols; `length` is in windows before quantization
/// and in symbol periods after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub symbol: Symbol,
    pub length: usize,
}

impl Run {
    pub fn new(symbol: Symbol, length: usize) -> Self {
        Self { symbol, length }
    }
}

pub fn run_length_encode(symbols: &[Symbol]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &symbol in symbols {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.length += 1,
            _ => runs.push(Run::new(symbol, 1)),
        }
    }
    runs
}

/// Nearest whole number of symbol periods in `windows` windows, rounding
/// half to even
pub fn quantize_length(windows: usize, windows_per_symbol: usize) -> usize {
    let quotient = windows / windows_per_symbol;
    let twice_remainder = 2 * (windows % windows_per_symbol);
    if twice_remainder > windows_per_symbol
        || (twice_remainder == windows_per_symbol && quotient % 2 == 1)
    {
        quotient + 1
    } else {
        quotient
    }
}

/// Convert window counts to symbol-period counts; runs may quantize to zero
pub fn quantize_runs(runs: &[Run], windows_per_symbol: usize) -> Vec<Run> {
    runs.iter()
        .map(|run| Run::new(run.symbol, quantize_length(run.length, windows_per_symbol)))
        .collect()
}
