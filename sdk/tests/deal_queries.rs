//! Client reads and transaction preparation over an in-memory transport

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use solana_sdk::{pubkey::Pubkey, signature::Keypair};
    use yield_market_sdk::accounts::RawAccount;
    use yield_market_sdk::testing::{
        listed_lp_deal, listed_yield_deal, protocol_config, purchased, seed_config, seed_lp_deal,
        seed_yield_deal, FaultTarget, MemoryTransport, FIXTURE_CREATED_AT,
    };
    use yield_market_sdk::{
        quote_purchase_with_config, Amount, CreateYieldDealParams, DealDuration, DealFilter,
        DealStatus, ErrorContext, SdkError, SourceProtocol, TransportFault, YieldMarketClient,
    };

    struct Harness {
        transport: Arc<MemoryTransport>,
        client: YieldMarketClient,
    }

    fn harness_with(transport: MemoryTransport) -> Harness {
        let transport = Arc::new(transport);
        let client = YieldMarketClient::with_transport(transport.clone(), Pubkey::new_unique());
        Harness { transport, client }
    }

    fn harness() -> Harness {
        harness_with(MemoryTransport::new())
    }

    fn params() -> CreateYieldDealParams {
        CreateYieldDealParams {
            yield_token_mint: Pubkey::new_unique(),
            payment_mint: Pubkey::new_unique(),
            source_protocol: SourceProtocol::Marinade,
            locked_token_amount: Amount::new(5_000_000_000),
            locked_value: Amount::new(5_000_000_000),
            expected_yield: Amount::new(120_000_000),
            selling_price: Amount::new(100_000_000),
            duration: DealDuration::Days180,
        }
    }

    #[tokio::test]
    async fn test_absent_deal_is_none() {
        let h = harness();
        assert!(h.client.yield_deals.get_deal(7).await.unwrap().is_none());
        assert!(h.client.lp_deals.get_deal(7).await.unwrap().is_none());
        assert!(h.client.protocol.get_config().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_not_found_fault_is_none() {
        let h = harness_with(MemoryTransport::with_not_found_faults());
        assert!(h.client.yield_deals.get_deal(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_fault_is_fetch_error() {
        let h = harness();
        h.transport
            .fail(FaultTarget::Fetch, TransportFault::new("connection reset by peer"));

        let err = h.client.yield_deals.get_deal(1).await.unwrap_err();
        match err {
            SdkError::Fetch { target, source } => {
                assert!(target.starts_with("YieldDeal"));
                assert_eq!(source.message.as_deref(), Some("connection reset by peer"));
            }
            other => panic!("expected Fetch, got {:?}", other),
        }

        h.transport.clear_faults();
        assert!(h.client.yield_deals.get_deal(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_deal_decodes_stored_account() {
        let h = harness();
        let seller = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();
        let purchased_at = FIXTURE_CREATED_AT + 3_600;
        let raw = purchased(listed_yield_deal(3, seller), buyer, purchased_at);
        let address = seed_yield_deal(&h.transport, &h.client.pda, &raw).unwrap();

        let deal = h.client.yield_deals.get_deal(3).await.unwrap().unwrap();
        assert_eq!(deal.address, address);
        assert_eq!(deal.seller, seller);
        assert_eq!(deal.buyer, Some(buyer));
        assert_eq!(deal.status, DealStatus::Active);
        assert_eq!(deal.duration, DealDuration::Days90);
        assert!(!deal.is_available);
        // Fixture deals ended long ago relative to the wall clock
        assert!(deal.is_expired);
        assert_eq!(
            deal.ends_at.unwrap().timestamp(),
            purchased_at + DealDuration::Days90.seconds()
        );
    }

    #[tokio::test]
    async fn test_status_filter_preserves_order() {
        let h = harness();
        let seller = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();
        for id in [5u64, 2, 9, 4] {
            let mut raw = listed_yield_deal(id, seller);
            if id % 2 == 0 {
                raw = purchased(raw, buyer, FIXTURE_CREATED_AT + 60);
            }
            seed_yield_deal(&h.transport, &h.client.pda, &raw).unwrap();
        }

        let all = h.client.yield_deals.get_deals(None).await.unwrap();
        let ids: Vec<u64> = all.iter().map(|d| d.deal_id).collect();
        assert_eq!(ids, vec![5, 2, 9, 4]);

        let active = h
            .client
            .yield_deals
            .get_deals(Some(&DealFilter::new().status(DealStatus::Active)))
            .await
            .unwrap();
        let ids: Vec<u64> = active.iter().map(|d| d.deal_id).collect();
        assert_eq!(ids, vec![2, 4]);

        let available = h.client.yield_deals.get_available_deals().await.unwrap();
        let ids: Vec<u64> = available.iter().map(|d| d.deal_id).collect();
        assert_eq!(ids, vec![5, 9]);

        let by_buyer = h.client.yield_deals.get_deals_by_buyer(buyer).await.unwrap();
        assert_eq!(by_buyer.len(), 2);
    }

    #[tokio::test]
    async fn test_seller_protocol_and_price_filters() {
        let h = harness();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        let mut cheap = listed_yield_deal(1, alice);
        cheap.selling_price = 10_000_000;
        cheap.source_protocol = SourceProtocol::KaminoLend.tag();
        seed_yield_deal(&h.transport, &h.client.pda, &cheap).unwrap();
        seed_yield_deal(&h.transport, &h.client.pda, &listed_yield_deal(2, bob)).unwrap();
        seed_yield_deal(&h.transport, &h.client.pda, &listed_yield_deal(3, alice)).unwrap();

        let by_seller = h.client.yield_deals.get_deals_by_seller(alice).await.unwrap();
        let ids: Vec<u64> = by_seller.iter().map(|d| d.deal_id).collect();
        assert_eq!(ids, vec![1, 3]);

        let jito = h
            .client
            .yield_deals
            .get_deals_by_protocol(SourceProtocol::Jito)
            .await
            .unwrap();
        let ids: Vec<u64> = jito.iter().map(|d| d.deal_id).collect();
        assert_eq!(ids, vec![2, 3]);

        let band = DealFilter::new()
            .min_price(Amount::new(20_000_000))
            .max_price(Amount::new(70_000_000))
            .seller(alice);
        let matched = h.client.yield_deals.get_deals(Some(&band)).await.unwrap();
        let ids: Vec<u64> = matched.iter().map(|d| d.deal_id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_protocol_filter_excludes_lp_deals() {
        let h = harness();
        seed_lp_deal(&h.transport, &h.client.pda, &listed_lp_deal(1, Pubkey::new_unique())).unwrap();
        // A yield deal in the same store must not leak into LP listings
        seed_yield_deal(&h.transport, &h.client.pda, &listed_yield_deal(2, Pubkey::new_unique()))
            .unwrap();

        let lp = h.client.lp_deals.get_deals(None).await.unwrap();
        assert_eq!(lp.len(), 1);
        assert_eq!(lp[0].deal_id, 1);

        let filter = DealFilter::new().source_protocol(SourceProtocol::Jito);
        assert!(h.client.lp_deals.get_deals(Some(&filter)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_tag_is_reported() {
        let h = harness();
        let mut raw = listed_yield_deal(1, Pubkey::new_unique());
        raw.status = 42;
        seed_yield_deal(&h.transport, &h.client.pda, &raw).unwrap();

        let err = h.client.yield_deals.get_deal(1).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::UnknownVariant { field: "status", tag: 42 }
        ));
        // Bulk reads fail the same way instead of silently dropping the record
        assert!(h.client.yield_deals.get_deals(None).await.is_err());
    }

    #[tokio::test]
    async fn test_truncated_account_is_deserialization_error() {
        let h = harness();
        let raw = listed_yield_deal(1, Pubkey::new_unique());
        let mut bytes = raw.encode().unwrap();
        bytes.truncate(20);
        let (address, _) = h.client.pda.yield_deal(1);
        h.transport.insert(address, bytes);

        assert!(matches!(
            h.client.yield_deals.get_deal(1).await,
            Err(SdkError::DeserializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_uses_config_counter() {
        let h = harness();
        let authority = Pubkey::new_unique();
        seed_config(&h.transport, &h.client.pda, &protocol_config(authority, 17)).unwrap();

        let prepared = h
            .client
            .yield_deals
            .create_deal_ixs(Pubkey::new_unique(), &params())
            .await
            .unwrap();
        assert_eq!(prepared.deal_id, 17);
        assert_eq!(prepared.address, h.client.pda.yield_deal(17).0);
        assert!(!prepared.instructions.is_empty());
        assert!(prepared
            .instructions
            .iter()
            .any(|ix| ix.program_id == h.client.program_id()));
    }

    #[tokio::test]
    async fn test_create_without_config_fails() {
        let h = harness();
        let err = h
            .client
            .yield_deals
            .create_deal_ixs(Pubkey::new_unique(), &params())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_price_above_yield() {
        let h = harness();
        seed_config(&h.transport, &h.client.pda, &protocol_config(Pubkey::new_unique(), 0)).unwrap();

        let mut bad = params();
        bad.selling_price = Amount::new(130_000_000);
        let err = h
            .client
            .yield_deals
            .create_deal_ixs(Pubkey::new_unique(), &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidInput(_)));
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn test_buy_prepends_token_accounts() {
        let h = harness();
        seed_config(&h.transport, &h.client.pda, &protocol_config(Pubkey::new_unique(), 1)).unwrap();
        seed_yield_deal(&h.transport, &h.client.pda, &listed_yield_deal(0, Pubkey::new_unique()))
            .unwrap();

        let ixs = h
            .client
            .yield_deals
            .buy_deal_ixs(Pubkey::new_unique(), 0)
            .await
            .unwrap();
        assert_eq!(ixs.len(), 3);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[1].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[2].program_id, h.client.program_id());
    }

    #[tokio::test]
    async fn test_settle_requires_buyer() {
        let h = harness();
        seed_yield_deal(&h.transport, &h.client.pda, &listed_yield_deal(0, Pubkey::new_unique()))
            .unwrap();

        let err = h
            .client
            .yield_deals
            .settle_deal_ixs(Pubkey::new_unique(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_buyback_penalty_outside_bounds() {
        let h = harness();
        seed_config(&h.transport, &h.client.pda, &protocol_config(Pubkey::new_unique(), 1)).unwrap();
        let raw = purchased(
            listed_yield_deal(0, Pubkey::new_unique()),
            Pubkey::new_unique(),
            FIXTURE_CREATED_AT,
        );
        seed_yield_deal(&h.transport, &h.client.pda, &raw).unwrap();

        let err = h.client.yield_deals.buyback_deal_ixs(0, 5_000).await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidInput(_)));

        let ixs = h.client.yield_deals.buyback_deal_ixs(0, 500).await.unwrap();
        assert_eq!(ixs.last().unwrap().program_id, h.client.program_id());
    }

    #[tokio::test]
    async fn test_send_classifies_program_fault() {
        let h = harness();
        h.transport.fail(
            FaultTarget::Submit,
            TransportFault::with_code(6004)
                .message("custom program error: 0x1774")
                .logs(vec!["Program log: deal taken".to_string()]),
        );

        let payer = Keypair::new();
        let context = ErrorContext::operation("buy").with_deal_id(123);
        let err = h.client.send(&[], &[&payer], &context).await.unwrap_err();

        match &err {
            SdkError::DealNotAvailable { deal_id, message, .. } => {
                assert_eq!(*deal_id, Some(123));
                assert!(message.contains("123"));
            }
            other => panic!("expected DealNotAvailable, got {:?}", other),
        }
        assert_eq!(err.code(), Some(6004));
        assert_eq!(err.logs(), ["Program log: deal taken".to_string()]);
        assert!(h.transport.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_send_keeps_codeless_fault_as_transport() {
        let h = harness();
        h.transport
            .fail(FaultTarget::Submit, TransportFault::new("connection refused"));

        let payer = Keypair::new();
        let context = ErrorContext::operation("buy").with_deal_id(5);
        let err = h.client.send(&[], &[&payer], &context).await.unwrap_err();

        match &err {
            SdkError::Transport(fault) => {
                assert_eq!(fault.message.as_deref(), Some("connection refused"));
            }
            other => panic!("expected Transport, got {:?}", other),
        }
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_send_records_submission() {
        let h = harness();
        let payer = Keypair::new();
        let ixs = h
            .client
            .protocol
            .set_paused_ixs(Pubkey::new_unique(), true)
            .unwrap();

        h.client
            .send(&ixs, &[&payer], &ErrorContext::operation("pause"))
            .await
            .unwrap();
        assert_eq!(h.transport.submitted(), vec![ixs]);
    }

    #[tokio::test]
    async fn test_purchase_quote_uses_stored_fee() {
        let h = harness();
        let stored = protocol_config(Pubkey::new_unique(), 0);
        seed_config(&h.transport, &h.client.pda, &stored).unwrap();
        let config = h.client.protocol.get_config().await.unwrap().unwrap();

        let quote = quote_purchase_with_config(Amount::new(70_000_000), &config).unwrap();
        assert_eq!(quote.protocol_fee, Amount::new(1_750_000));
        assert_eq!(quote.seller_proceeds, Amount::new(68_250_000));
    }

    #[tokio::test]
    async fn test_is_paused_reads_config() {
        let h = harness();
        let mut config = protocol_config(Pubkey::new_unique(), 0);
        seed_config(&h.transport, &h.client.pda, &config).unwrap();
        assert!(!h.client.protocol.is_paused().await.unwrap());

        config.is_paused = true;
        seed_config(&h.transport, &h.client.pda, &config).unwrap();
        assert!(h.client.protocol.is_paused().await.unwrap());
    }
}
