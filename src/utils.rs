use ethers::types::U256;

/// Wei per ETH as a U256 power of ten.
pub fn wei_per_eth() -> U256 {
    U256::exp10(18)
}

/// Format a wei amount as an exact decimal ETH string (no floats).
pub fn format_eth(wei: U256) -> String {
    let base = wei_per_eth();
    let whole = wei / base;
    let frac = wei % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>18}", frac.to_string());
    let trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Format an address truncated for display.
pub fn format_address(address: &str) -> String {
    if address.len() <= 12 {
        address.to_string()
    } else {
        format!("{}...{}", &address[..6], &address[address.len() - 6..])
    }
}
