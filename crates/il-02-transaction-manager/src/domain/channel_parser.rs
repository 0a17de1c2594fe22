//! # Channel Parser
//!
//! Replays a channel's confirmed transactions in append order.
//!
//! The channel type and key are fixed by the first transaction that parses,
//! validates and hashes to the channel id. Every transaction before it is
//! ignored for good; every later one is decoded with the fixed type and key.
//! The loop carries that state forward and cannot be parallelized.

use il_01_data_access::ConfirmedTransaction;
use shared_types::{ChannelKey, ChannelType};

use super::entities::{
    ChannelTypeAndKey, CleanChannel, IgnoreReason, IgnoredTransaction, ParseResult,
    ValidTransaction, ValidatedData,
};
use super::transactions_parser::TransactionsParser;

/// State carried from one transaction to the next.
#[derive(Debug, Default)]
struct ChannelState {
    channel_type: ChannelType,
    channel_key: Option<ChannelKey>,
    encryption_method: Option<String>,
}

#[derive(Clone, Default)]
pub struct ChannelParser {
    transactions_parser: TransactionsParser,
}

impl ChannelParser {
    pub fn new(transactions_parser: TransactionsParser) -> Self {
        Self {
            transactions_parser,
        }
    }

    /// Split `transactions` into the channel's valid and ignored entries.
    ///
    /// Both output lists have the input's length and are aligned with it.
    pub async fn decrypt_and_clean_channel(
        &self,
        channel_id: &str,
        transactions: &[ConfirmedTransaction],
    ) -> CleanChannel {
        let mut state = ChannelState::default();
        let mut valid = Vec::with_capacity(transactions.len());
        let mut ignored = Vec::with_capacity(transactions.len());

        for confirmed in transactions {
            match self.process(channel_id, &mut state, confirmed).await {
                Ok(data) => {
                    valid.push(Some(ValidTransaction {
                        data: data.data,
                        timestamp: confirmed.timestamp,
                    }));
                    ignored.push(None);
                }
                Err(reason) => {
                    tracing::debug!(
                        channel_id = %channel_id,
                        timestamp = confirmed.timestamp,
                        reason = %reason,
                        "Channel transaction ignored"
                    );
                    valid.push(None);
                    ignored.push(Some(IgnoredTransaction {
                        reason,
                        transaction: confirmed.clone(),
                    }));
                }
            }
        }

        CleanChannel {
            channel_type: state.channel_type,
            channel_key: state.channel_key,
            encryption_method: state.encryption_method,
            transactions: valid,
            ignored_transactions: ignored,
        }
    }

    /// Recover only the channel type and key, skipping failures silently.
    pub async fn get_channel_type_and_key(
        &self,
        channel_id: &str,
        transactions: &[ConfirmedTransaction],
    ) -> ChannelTypeAndKey {
        let mut state = ChannelState::default();

        for confirmed in transactions {
            if state.channel_type != ChannelType::Unknown {
                break;
            }
            // Failures before the first match leave the state untouched.
            let _ = self.process(channel_id, &mut state, confirmed).await;
        }

        ChannelTypeAndKey {
            channel_type: state.channel_type,
            channel_key: state.channel_key,
        }
    }

    async fn process(
        &self,
        channel_id: &str,
        state: &mut ChannelState,
        confirmed: &ConfirmedTransaction,
    ) -> Result<ValidatedData, IgnoreReason> {
        let ParseResult {
            transaction,
            channel_key,
            encryption_method,
        } = self
            .transactions_parser
            .parse_persisted_transaction(
                &confirmed.transaction,
                state.channel_type,
                state.channel_key.as_ref(),
            )
            .await
            .map_err(IgnoreReason::Parse)?;

        let validated = transaction.validate().map_err(IgnoreReason::Validation)?;

        if state.channel_type == ChannelType::Unknown {
            if validated.hash != channel_id {
                return Err(IgnoreReason::ChannelMismatch);
            }
            state.channel_type = if channel_key.is_some() {
                ChannelType::Encrypted
            } else {
                ChannelType::Clear
            };
            state.channel_key = channel_key;
            state.encryption_method = encryption_method;
            tracing::debug!(
                channel_id = %channel_id,
                channel_type = ?state.channel_type,
                "Channel type fixed by first transaction"
            );
        }

        Ok(validated)
    }
}
