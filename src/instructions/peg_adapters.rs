use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn_checked, mint_to, BurnChecked, Mint, MintTo, TokenAccount, TokenInterface,
};
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::{
    constants::{MAX_CONFIDENCE_THRESHOLD, PRICE_DECIMALS, SUPPLY_AUTHORITY_SEED},
    errors::PegError,
    peg::{AuthGate, OracleFeed, OracleReading, SupplyController},
    state::{OracleConfig, RoleType},
    utils::normalize_decimals,
};

/// Oracle collaborator over a Pyth `PriceUpdateV2` account
pub struct PythOracleFeed<'a> {
    pub price_update: &'a PriceUpdateV2,
    pub config: OracleConfig,
    pub clock: &'a Clock,
}

impl<'a> PythOracleFeed<'a> {
    pub fn new(price_update: &'a PriceUpdateV2, config: OracleConfig, clock: &'a Clock) -> Self {
        Self {
            price_update,
            config,
            clock,
        }
    }
}

impl OracleFeed for PythOracleFeed<'_> {
    /// Reads the configured feed, reporting staleness, a feed mismatch, a non-positive
    /// price or a wide confidence interval as an invalid reading
    fn get_latest(&self, feed_name: &str) -> Result<OracleReading> {
        let feed_id = self.config.feed_id_for(feed_name)?;

        // Retrieve the price with freshness and feed id validation
        let price_update_data = match self.price_update.get_price_no_older_than(
            self.clock,
            self.config.max_age,
            &feed_id,
        ) {
            Ok(price) => price,
            Err(error) => {
                msg!("Pyth price for {} rejected: {:?}", feed_name, error);
                return Ok(OracleReading::invalid());
            }
        };

        // Require a positive price with a negative exponent (Pyth convention)
        if price_update_data.price <= 0 || price_update_data.exponent >= 0 {
            msg!(
                "Pyth price for {} rejected: price {} exponent {}",
                feed_name,
                price_update_data.price,
                price_update_data.exponent
            );
            return Ok(OracleReading::invalid());
        }

        let conf = price_update_data.conf as u128;
        let price = price_update_data.price as u128;

        // Check: conf * 100 <= price * threshold (equivalent to conf/price <= threshold %)
        let conf_times_100 = conf.checked_mul(100).ok_or(PegError::MathOverflow)?;
        let price_times_threshold = price
            .checked_mul(self.config.confidence_threshold as u128)
            .ok_or(PegError::MathOverflow)?;

        if conf_times_100 > price_times_threshold {
            msg!(
                "Pyth price for {} rejected: confidence {} exceeds {}% of price {}",
                feed_name,
                conf,
                self.config.confidence_threshold,
                price
            );
            return Ok(OracleReading::invalid());
        }

        let from_decimals = u8::try_from(-price_update_data.exponent)
            .map_err(|_| PegError::InvalidPriceData)?;

        let confidence = (MAX_CONFIDENCE_THRESHOLD as u128).saturating_sub(conf_times_100 / price);

        Ok(OracleReading {
            value: normalize_decimals(price, from_decimals, PRICE_DECIMALS, false)?,
            timestamp: price_update_data.publish_time,
            confidence: confidence as u8,
            is_valid: true,
        })
    }
}

/// Supply collaborator minting into and burning from the treasury token account
/// Signs with the supply authority PDA, which owns the treasury and holds mint authority
pub struct TreasurySupply<'a, 'info> {
    pub mint: &'a mut InterfaceAccount<'info, Mint>,
    pub treasury: &'a mut InterfaceAccount<'info, TokenAccount>,
    pub supply_authority: &'a UncheckedAccount<'info>,
    pub token_program: &'a Interface<'info, TokenInterface>,
    pub supply_authority_bump: u8,
    pub max_supply: u64,
}

/// Converts an 18-decimal amount to base units of a mint with `decimals`, rounding down
pub fn to_base_units(amount: u128, decimals: u8) -> Result<u64> {
    let amount = normalize_decimals(amount, PRICE_DECIMALS, decimals, false)?;
    u64::try_from(amount).map_err(|_| PegError::MathOverflow.into())
}

/// Converts base units of a mint with `decimals` back to 18 decimals
pub fn from_base_units(amount: u64, decimals: u8) -> Result<u128> {
    normalize_decimals(amount as u128, decimals, PRICE_DECIMALS, false)
}

impl TreasurySupply<'_, '_> {
    fn reload(&mut self) -> Result<()> {
        self.mint.reload()?;
        self.treasury.reload()
    }
}

impl SupplyController for TreasurySupply<'_, '_> {
    fn mint(&mut self, amount: u128) -> Result<u128> {
        let decimals = self.mint.decimals;
        let base_amount = to_base_units(amount, decimals)?;
        if base_amount == 0 {
            msg!("Mint of {} is below one base unit, skipped", amount);
            return Ok(0);
        }

        let new_supply = self
            .mint
            .supply
            .checked_add(base_amount)
            .ok_or(PegError::MathOverflow)?;
        require_gte!(self.max_supply, new_supply, PegError::MintCapExceeded);

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.mint.to_account_info(),
                    to: self.treasury.to_account_info(),
                    authority: self.supply_authority.to_account_info(),
                },
                &[&[SUPPLY_AUTHORITY_SEED, &[self.supply_authority_bump]]],
            ),
            base_amount,
        )?;

        self.reload()?;
        from_base_units(base_amount, decimals)
    }

    fn burn(&mut self, amount: u128) -> Result<u128> {
        let decimals = self.mint.decimals;
        let base_amount = to_base_units(amount, decimals)?;
        if base_amount == 0 {
            msg!("Burn of {} is below one base unit, skipped", amount);
            return Ok(0);
        }
        require_gte!(self.treasury.amount, base_amount, PegError::InsufficientBalance);

        burn_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                BurnChecked {
                    mint: self.mint.to_account_info(),
                    from: self.treasury.to_account_info(),
                    authority: self.supply_authority.to_account_info(),
                },
                &[&[SUPPLY_AUTHORITY_SEED, &[self.supply_authority_bump]]],
            ),
            base_amount,
            decimals,
        )?;

        self.reload()?;
        from_base_units(base_amount, decimals)
    }

    fn balance_of_self(&self) -> Result<u128> {
        from_base_units(self.treasury.amount, self.mint.decimals)
    }
}

/// Authorization gate built from a verified `Roles` account and the stored pause flag
pub struct RoleGate {
    pub caller: Pubkey,
    pub role: RoleType,
    pub paused: bool,
}

impl RoleGate {
    pub fn new(caller: Pubkey, role: RoleType, paused: bool) -> Self {
        Self {
            caller,
            role,
            paused,
        }
    }
}

impl AuthGate for RoleGate {
    fn caller(&self) -> Pubkey {
        self.caller
    }

    fn check(&self, role: RoleType) -> bool {
        self.role == role
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
