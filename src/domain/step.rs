//! The fixed per-cycle operation template.

use serde::{Deserialize, Serialize};

/// One operation in a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleStep {
    Wrap,
    Unwrap,
    SwapBuy,
    SwapSell,
    SecondDexBuy,
    SecondDexSell,
    Transfer,
    Deploy,
    Stake,
}

/// Executed in order, once per cycle
pub const CYCLE_TEMPLATE: [CycleStep; 9] = [
    CycleStep::Wrap,
    CycleStep::Unwrap,
    CycleStep::SwapBuy,
    CycleStep::SwapSell,
    CycleStep::SecondDexBuy,
    CycleStep::SecondDexSell,
    CycleStep::Transfer,
    CycleStep::Deploy,
    CycleStep::Stake,
];

impl CycleStep {
    /// Prefix of the outcome log line
    pub fn label(&self) -> &'static str {
        match self {
            CycleStep::Wrap => "Swap wrap",
            CycleStep::Unwrap => "Swap unwrap",
            CycleStep::SwapBuy => "Uniswap buy",
            CycleStep::SwapSell => "Uniswap sell",
            CycleStep::SecondDexBuy => "BeanSwap buy",
            CycleStep::SecondDexSell => "BeanSwap sell",
            CycleStep::Transfer => "SendTx",
            CycleStep::Deploy => "Deploy",
            CycleStep::Stake => "Kitsu",
        }
    }

    /// Whether a random pause follows this step (the first leg of each pair)
    pub fn pauses_after(&self) -> bool {
        matches!(self, CycleStep::Wrap | CycleStep::SwapBuy | CycleStep::SecondDexBuy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_order() {
        assert_eq!(CYCLE_TEMPLATE.len(), 9);
        assert_eq!(CYCLE_TEMPLATE[0], CycleStep::Wrap);
        assert_eq!(CYCLE_TEMPLATE[6], CycleStep::Transfer);
        assert_eq!(CYCLE_TEMPLATE[8], CycleStep::Stake);
    }

    #[test]
    fn test_pauses_follow_first_legs_only() {
        let pausing: Vec<_> = CYCLE_TEMPLATE.iter().filter(|s| s.pauses_after()).collect();
        assert_eq!(pausing, vec![&CycleStep::Wrap, &CycleStep::SwapBuy, &CycleStep::SecondDexBuy]);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = CYCLE_TEMPLATE.iter().map(|s| s.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), CYCLE_TEMPLATE.len());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&CycleStep::SecondDexBuy).unwrap(), "\"second-dex-buy\"");
    }
}
