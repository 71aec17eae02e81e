// =============================================================================
// Rule Combiner — Fixed-order multi-factor scoring
// =============================================================================
//
// Maps a feature snapshot plus thresholds to a scored BUY/SELL/NEUTRAL
// decision. The evaluation order is part of the contract: the reasons trail
// must be reproducible, so rules always run in the order below.
//
//   1. RSI oversold/overbought        ±0.25  (else-if, mutually exclusive)
//   2. MFI oversold/overbought        ±0.20  (else-if, mutually exclusive)
//   3. OBV slope                      ±0.10
//   4. Volume spike with close sign   ±0.15  (only when the flag is set)
//   5. Basis/funding confluence       ±0.20  (only when |z| >= enter)
//   6. OI confluence                  ±0.10  (two independent checks)
//
// The running sum is clamped to [-1, +1] once, at the end. Classification
// boundaries are inclusive: score >= 0.25 is BUY, <= -0.25 is SELL.

use super::{Action, FeatureSnapshot, Signal, Thresholds};

const RSI_WEIGHT: f64 = 0.25;
const MFI_WEIGHT: f64 = 0.20;
const OBV_WEIGHT: f64 = 0.10;
const VOLUME_WEIGHT: f64 = 0.15;
const BASIS_WEIGHT: f64 = 0.20;
const OI_WEIGHT: f64 = 0.10;

/// Score threshold at which a signal becomes directional (inclusive).
const ACTION_THRESHOLD: f64 = 0.25;

/// Evaluate the rule set against `ctx` and produce a scored decision.
///
/// Pure: no I/O, no shared state, deterministic for a given snapshot and
/// threshold set.
pub fn combine_rules(ctx: &FeatureSnapshot, thresholds: &Thresholds) -> Signal {
    let mut score = 0.0_f64;
    let mut reasons = Vec::new();

    // 1. RSI — a single oscillator cannot be both oversold and overbought.
    if ctx.rsi < thresholds.rsi_oversold {
        score += RSI_WEIGHT;
        reasons.push(format!(
            "RSI {:.1} < oversold {}",
            ctx.rsi, thresholds.rsi_oversold
        ));
    } else if ctx.rsi > thresholds.rsi_overbought {
        score -= RSI_WEIGHT;
        reasons.push(format!(
            "RSI {:.1} > overbought {}",
            ctx.rsi, thresholds.rsi_overbought
        ));
    }

    // 2. MFI — same structure, its own thresholds.
    if ctx.mfi < thresholds.mfi_oversold {
        score += MFI_WEIGHT;
        reasons.push(format!(
            "MFI {:.1} < oversold {}",
            ctx.mfi, thresholds.mfi_oversold
        ));
    } else if ctx.mfi > thresholds.mfi_overbought {
        score -= MFI_WEIGHT;
        reasons.push(format!(
            "MFI {:.1} > overbought {}",
            ctx.mfi, thresholds.mfi_overbought
        ));
    }

    // 3. OBV slope — zero slope contributes nothing.
    if ctx.obv_slope > 0.0 {
        score += OBV_WEIGHT;
        reasons.push("OBV rising (accumulation)".to_string());
    } else if ctx.obv_slope < 0.0 {
        score -= OBV_WEIGHT;
        reasons.push("OBV falling (distribution)".to_string());
    }

    // 4. Volume spike — direction follows the latest close change.
    if ctx.vol_spike {
        if ctx.spot_last > ctx.spot_prev {
            score += VOLUME_WEIGHT;
            reasons.push("Volume spike with up-close".to_string());
        } else {
            score -= VOLUME_WEIGHT;
            reasons.push("Volume spike with down-close".to_string());
        }
    }

    // 5. Basis/funding confluence — armed only past the entry threshold;
    // mixed-sign combinations contribute nothing.
    if ctx.basis_z.abs() >= thresholds.basis_enter {
        if ctx.basis_z > 0.0 && ctx.funding > 0.0 {
            score -= BASIS_WEIGHT;
            reasons.push(format!(
                "Positive basis z={:.2} & funding {:.4} (froth -> SELL bias)",
                ctx.basis_z, ctx.funding
            ));
        } else if ctx.basis_z < 0.0 && ctx.funding < 0.0 {
            score += BASIS_WEIGHT;
            reasons.push(format!(
                "Negative basis z={:.2} & funding {:.4} (stress -> BUY bias)",
                ctx.basis_z, ctx.funding
            ));
        }
    }

    // 6. OI confluence — two independent checks, deliberately not an
    // else-if chain. The same price delta cannot satisfy both today, but
    // each condition stands on its own.
    if ctx.spot_last > ctx.spot_prev && ctx.oi_change > 0.0 {
        score += OI_WEIGHT;
        reasons.push("Price up + OI up (long buildup)".to_string());
    }
    if ctx.spot_last < ctx.spot_prev && ctx.oi_change > 0.0 {
        score -= OI_WEIGHT;
        reasons.push("Price down + OI up (short buildup)".to_string());
    }

    // The only clamp in the pipeline: individual contributions are never
    // clamped mid-evaluation.
    let score = score.clamp(-1.0, 1.0);

    let action = if score >= ACTION_THRESHOLD {
        Action::Buy
    } else if score <= -ACTION_THRESHOLD {
        Action::Sell
    } else {
        Action::Neutral
    };

    Signal {
        action,
        score,
        reasons,
    }
}
