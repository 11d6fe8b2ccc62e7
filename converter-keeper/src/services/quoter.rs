//! Quote Service
//!
//! Replays conversions and share math off-chain with the programs' own
//! routing and arithmetic.

use anchor_lang::prelude::Pubkey;
use fee_converter::{
    router::{validate_batch, Recipient, Router},
    simulation::{PairSnapshot, SnapshotHost, SwapRecord},
    state::BridgeEntry,
};
use share_vault::math::{assets_for_shares, shares_for_deposit};
use std::str::FromStr;

use crate::{
    error::{KeeperError, Result},
    types::{
        ConversionQuote, ConvertQuoteRequest, ConvertQuoteResponse, EnterQuoteRequest,
        EnterQuoteResponse, HopQuote, LeaveQuoteRequest, LeaveQuoteResponse,
    },
};

pub struct Quoter;

impl Quoter {
    pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
        Pubkey::from_str(s).map_err(|e| KeeperError::InvalidPubkey(format!("{s}: {e}")))
    }

    pub fn parse_amount(s: &str) -> Result<u64> {
        s.parse()
            .map_err(|e| KeeperError::InvalidAmount(format!("{s}: {e}")))
    }

    /// Quote converting every target in order, as one `convert_multiple`.
    /// Any target that would fail rejects the whole quote, and so does a
    /// target list the program would refuse as a batch.
    pub fn quote_conversions(
        req: &ConvertQuoteRequest,
        max_targets: usize,
    ) -> Result<ConvertQuoteResponse> {
        if req.targets.is_empty() {
            return Err(KeeperError::BadRequest("no targets".to_string()));
        }
        if req.targets.len() > max_targets {
            return Err(KeeperError::TooManyTargets { max: max_targets });
        }
        validate_batch(req.targets.len(), req.targets.len())?;

        let base_mint = Self::parse_pubkey(&req.base_mint)?;
        let wrapped_native_mint = Self::parse_pubkey(&req.wrapped_native_mint)?;

        let bridges = req
            .bridges
            .iter()
            .map(|b| {
                Ok(BridgeEntry {
                    token: Self::parse_pubkey(&b.token)?,
                    bridge: Self::parse_pubkey(&b.bridge)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut host = SnapshotHost::new(base_mint);
        for pair in &req.pairs {
            host.add_pair(PairSnapshot::new(
                Self::parse_pubkey(&pair.token_a)?,
                Self::parse_pubkey(&pair.token_b)?,
                Self::parse_amount(&pair.reserve_a)?,
                Self::parse_amount(&pair.reserve_b)?,
                Self::parse_amount(&pair.claim_supply)?,
                Self::parse_amount(&pair.claims_held)?,
            ));
        }

        let targets = req
            .targets
            .iter()
            .map(|t| Ok((Self::parse_pubkey(&t.token_a)?, Self::parse_pubkey(&t.token_b)?)))
            .collect::<Result<Vec<_>>>()?;

        let router = Router {
            base_mint,
            wrapped_native_mint,
            bridges: &bridges,
        };

        let results = host.transact(|h| {
            targets
                .iter()
                .map(|(token_a, token_b)| {
                    let start = h.swaps().len();
                    let conversion = router.convert(h, *token_a, *token_b)?;
                    Ok((conversion, h.swaps()[start..].to_vec()))
                })
                .collect::<anchor_lang::Result<Vec<_>>>()
        })?;

        let mut total_out: u64 = 0;
        let mut conversions = Vec::with_capacity(results.len());
        for (conversion, swaps) in results {
            total_out = total_out
                .checked_add(conversion.amount_out)
                .ok_or_else(|| KeeperError::Rejected("MathOverflow".to_string()))?;

            conversions.push(ConversionQuote {
                token_a: conversion.token_a.to_string(),
                token_b: conversion.token_b.to_string(),
                amount_a: conversion.amount_a.to_string(),
                amount_b: conversion.amount_b.to_string(),
                amount_out: conversion.amount_out.to_string(),
                hops: swaps.iter().map(Self::hop_quote).collect(),
            });
        }

        Ok(ConvertQuoteResponse {
            conversions,
            total_out: total_out.to_string(),
        })
    }

    fn hop_quote(swap: &SwapRecord) -> HopQuote {
        HopQuote {
            from: swap.from.to_string(),
            to: swap.to.to_string(),
            amount_in: swap.amount_in.to_string(),
            amount_out: swap.amount_out.to_string(),
            to_vault: swap.recipient == Recipient::Vault,
        }
    }

    pub fn quote_enter(req: &EnterQuoteRequest) -> Result<EnterQuoteResponse> {
        let amount = Self::parse_amount(&req.amount)?;
        if amount == 0 {
            return Err(KeeperError::Rejected("ZeroAmount".to_string()));
        }

        let shares = shares_for_deposit(
            amount,
            Self::parse_amount(&req.pool_balance)?,
            Self::parse_amount(&req.total_shares)?,
        )?;

        Ok(EnterQuoteResponse {
            shares: shares.to_string(),
        })
    }

    pub fn quote_leave(req: &LeaveQuoteRequest) -> Result<LeaveQuoteResponse> {
        let shares = Self::parse_amount(&req.shares)?;
        if shares == 0 {
            return Err(KeeperError::Rejected("ZeroAmount".to_string()));
        }

        let total_shares = Self::parse_amount(&req.total_shares)?;
        if shares > total_shares {
            return Err(KeeperError::Rejected("InsufficientShares".to_string()));
        }

        let assets = assets_for_shares(shares, Self::parse_amount(&req.pool_balance)?, total_shares)?;

        Ok(LeaveQuoteResponse {
            assets: assets.to_string(),
        })
    }
}
