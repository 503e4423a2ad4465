extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address,
};

use crate::{
    test::{add_pool, balance, fund, setup, staker},
    ContractError, FundingOutcome,
};

#[test]
fn test_first_funding_opens_horizon_at_now() {
    let (env, client, _owner, reward_token, _) = setup(100);

    StellarAssetClient::new(&env, &reward_token).mint(&client.address, &100_050);
    match client.account_new_funding() {
        FundingOutcome::Accounted(accounted) => {
            assert!(accounted.gap_anchored);
            assert_eq!(accounted.amount, 100_050);
            assert_eq!(accounted.new_end_tick, 1_100);
            assert_eq!(accounted.new_remainder, 50);
            assert_eq!(accounted.new_observed_balance, 100_050);
        }
        FundingOutcome::NothingToAccount => unreachable!("Expected funding to be accounted"),
    }

    let funding = client.get_funding();
    assert_eq!(funding.start_tick, 100);
    assert_eq!(funding.end_tick, 1_100);
    assert_eq!(funding.unallocated_remainder, 50);
    assert_eq!(funding.last_observed_balance, 100_050);
}

#[test]
fn test_unchanged_balance_accounts_nothing() {
    let (env, client, _owner, reward_token, _) = setup(100);
    fund(&env, &client, &reward_token, 10_000);
    let before = client.get_funding();

    assert_eq!(client.account_new_funding(), FundingOutcome::NothingToAccount);
    assert_eq!(client.get_funding(), before);
}

#[test]
fn test_funding_extends_live_horizon() {
    let (env, client, _owner, reward_token, _) = setup(100);
    fund(&env, &client, &reward_token, 100_050);

    env.ledger().set_sequence_number(600);
    StellarAssetClient::new(&env, &reward_token).mint(&client.address, &20_030);
    match client.account_new_funding() {
        FundingOutcome::Accounted(accounted) => {
            assert!(!accounted.gap_anchored);
            // 50 left over + 20_030 new = 200 ticks and 80 spare.
            assert_eq!(accounted.new_end_tick, 1_300);
            assert_eq!(accounted.new_remainder, 80);
        }
        FundingOutcome::NothingToAccount => unreachable!("Expected funding to be accounted"),
    }
}

#[test]
fn test_lapsed_gap_is_never_paid() {
    let (env, client, owner, reward_token, _) = setup(100);
    let stake_token = add_pool(&env, &client, &owner, 1_000);
    fund(&env, &client, &reward_token, 10_000);
    let alice = staker(&env, &stake_token, 1_000);
    client.deposit(&alice, &stake_token, &1_000, &None);

    env.ledger().set_sequence_number(300);
    assert_eq!(client.pending_reward(&stake_token, &alice), 10_000);

    // Refill long after the horizon at 200 lapsed.
    env.ledger().set_sequence_number(500);
    fund(&env, &client, &reward_token, 5_000);
    assert_eq!(client.get_funding().end_tick, 550);
    assert_eq!(client.get_pool(&0).last_synced_tick, 500);
    assert_eq!(client.pending_reward(&stake_token, &alice), 10_000);

    env.ledger().set_sequence_number(550);
    assert_eq!(client.pending_reward(&stake_token, &alice), 15_000);

    let receipt = client.harvest(&alice, &stake_token);
    assert_eq!(receipt.paid, 15_000);
    assert_eq!(balance(&env, &reward_token, &client.address), 0);
    assert_eq!(client.get_funding().last_observed_balance, 0);
}

#[test]
fn test_future_unallocated_tracks_horizon() {
    let (env, client, _owner, reward_token, _) = setup(100);
    fund(&env, &client, &reward_token, 100_050);

    assert_eq!(client.future_unallocated_rewards(), 100_050);
    env.ledger().set_sequence_number(600);
    assert_eq!(client.future_unallocated_rewards(), 50_050);
    env.ledger().set_sequence_number(2_000);
    assert_eq!(client.future_unallocated_rewards(), 50);
}

#[test]
fn test_set_rate_reschedules_remaining_budget() {
    let (env, client, owner, reward_token, _) = setup(100);
    let stake_token = add_pool(&env, &client, &owner, 1_000);
    fund(&env, &client, &reward_token, 100_000);
    let alice = staker(&env, &stake_token, 1_000);
    client.deposit(&alice, &stake_token, &1_000, &None);

    env.ledger().set_sequence_number(600);
    client.set_rate(&owner, &50);

    let funding = client.get_funding();
    assert_eq!(funding.reward_per_tick, 50);
    assert_eq!(funding.end_tick, 1_600);
    assert_eq!(funding.unallocated_remainder, 0);
    assert_eq!(client.pending_reward(&stake_token, &alice), 50_000);

    env.ledger().set_sequence_number(1_600);
    assert_eq!(client.pending_reward(&stake_token, &alice), 100_000);
}

#[test]
fn test_zero_rate_parks_budget_in_remainder() {
    let (env, client, owner, reward_token, _) = setup(100);
    client.set_rate(&owner, &0);
    fund(&env, &client, &reward_token, 7_000);

    let funding = client.get_funding();
    assert_eq!(funding.end_tick, 100);
    assert_eq!(funding.unallocated_remainder, 7_000);
    assert_eq!(client.future_unallocated_rewards(), 7_000);

    env.ledger().set_sequence_number(400);
    client.set_rate(&owner, &70);
    let funding = client.get_funding();
    assert_eq!(funding.end_tick, 500);
    assert_eq!(funding.unallocated_remainder, 0);
}

#[test]
fn test_negative_rate_rejected() {
    let (_env, client, owner, _, _) = setup(100);
    match client.try_set_rate(&owner, &-1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_recalculate_rate_spreads_budget_over_window() {
    let (env, client, owner, reward_token, _) = setup(100);
    let stake_token = add_pool(&env, &client, &owner, 1_000);
    client.set_ticks_per_day(&owner, &100);
    client.set_estimation_period_days(&owner, &10);
    fund(&env, &client, &reward_token, 100_000);
    let alice = staker(&env, &stake_token, 1_000);
    client.deposit(&alice, &stake_token, &1_000, &None);

    env.ledger().set_sequence_number(600);
    let new_rate = client.recalculate_rate(&owner);
    assert_eq!(new_rate, 50);

    let funding = client.get_funding();
    assert_eq!(funding.reward_per_tick, 50);
    assert_eq!(funding.end_tick, 1_600);

    env.ledger().set_sequence_number(1_600);
    assert_eq!(client.pending_reward(&stake_token, &alice), 100_000);
}

#[test]
fn test_recalculate_rate_reserves_referral_share() {
    let (env, client, owner, reward_token, _) = setup(100);
    client.set_ticks_per_day(&owner, &100);
    client.set_estimation_period_days(&owner, &10);
    client.set_referral_bps(&owner, &60);
    fund(&env, &client, &reward_token, 1_006_000);

    let new_rate = client.recalculate_rate(&owner);
    assert_eq!(new_rate, 1_000);
    let settings = client.get_settings();
    assert_eq!(settings.effective_rate, 1_006);
    assert_eq!(settings.end_tick, 1_100);
}

#[test]
fn test_withdraw_unallocated_shrinks_horizon() {
    let (env, client, owner, reward_token, _) = setup(100);
    fund(&env, &client, &reward_token, 100_000);

    client.withdraw_unallocated(&owner, &40_000);

    let funding = client.get_funding();
    assert_eq!(funding.end_tick, 700);
    assert_eq!(funding.last_observed_balance, 60_000);
    assert_eq!(balance(&env, &reward_token, &owner), 40_000);
    assert_eq!(client.reward_balance(), 60_000);
    assert_eq!(client.account_new_funding(), FundingOutcome::NothingToAccount);
}

#[test]
fn test_withdraw_unallocated_keeps_accrued_reward() {
    let (env, client, owner, reward_token, _) = setup(100);
    let stake_token = add_pool(&env, &client, &owner, 1_000);
    fund(&env, &client, &reward_token, 100_000);
    let alice = staker(&env, &stake_token, 1_000);
    client.deposit(&alice, &stake_token, &1_000, &None);

    env.ledger().set_sequence_number(600);
    match client.try_withdraw_unallocated(&owner, &50_001) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientBalance),
        _ => unreachable!("Expected InsufficientBalance error"),
    }
    client.withdraw_unallocated(&owner, &50_000);
    assert_eq!(client.get_funding().end_tick, 600);

    env.ledger().set_sequence_number(900);
    assert_eq!(client.harvest(&alice, &stake_token).paid, 50_000);
    assert_eq!(balance(&env, &reward_token, &client.address), 0);
}

#[test]
fn test_withdraw_unallocated_owner_only() {
    let (env, client, _owner, reward_token, _) = setup(100);
    fund(&env, &client, &reward_token, 100_000);
    let stranger = Address::generate(&env);

    match client.try_withdraw_unallocated(&stranger, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_referral_change_reschedules_at_new_effective_rate() {
    let (env, client, owner, reward_token, _) = setup(100);
    fund(&env, &client, &reward_token, 100_000);

    env.ledger().set_sequence_number(600);
    client.set_referral_bps(&owner, &100);

    // 50_000 left over 101 per tick.
    let funding = client.get_funding();
    assert_eq!(funding.reward_per_tick, 100);
    assert_eq!(funding.end_tick, 1_095);
    assert_eq!(funding.unallocated_remainder, 5);
    assert_eq!(client.get_settings().referral_bps, 100);
}

#[test]
fn test_raised_referral_share_only_applies_going_forward() {
    let (env, client, owner, reward_token, _) = setup(100);
    let stake_token = add_pool(&env, &client, &owner, 1_000);
    fund(&env, &client, &reward_token, 100_000);
    let referrer = Address::generate(&env);
    let alice = staker(&env, &stake_token, 1_000);
    client.deposit(&alice, &stake_token, &1_000, &Some(referrer.clone()));

    env.ledger().set_sequence_number(600);
    client.set_referral_bps(&owner, &500);
    // 50_000 left over 105 per tick.
    assert_eq!(client.get_funding().end_tick, 1_076);
    assert_eq!(client.get_funding().unallocated_remainder, 20);

    // Reward accrued at a zero share carries no referral.
    let receipt = client.harvest(&alice, &stake_token);
    assert_eq!(receipt.paid, 50_000);
    assert_eq!(receipt.referral, 0);

    env.ledger().set_sequence_number(1_076);
    assert_eq!(client.get_position(&stake_token, &alice).pending_referral, 2_380);
    let receipt = client.harvest(&alice, &stake_token);
    assert_eq!(receipt.paid, 47_600);
    assert_eq!(receipt.referral, 2_380);

    assert_eq!(balance(&env, &reward_token, &alice), 97_600);
    assert_eq!(balance(&env, &reward_token, &referrer), 2_380);
    assert_eq!(balance(&env, &reward_token, &client.address), 20);
    assert_eq!(client.get_funding().last_observed_balance, 20);
    assert_eq!(client.future_unallocated_rewards(), 20);
}

#[test]
fn test_referral_accrues_only_after_binding() {
    let (env, client, owner, reward_token, _) = setup(100);
    let stake_token = add_pool(&env, &client, &owner, 1_000);
    client.set_referral_bps(&owner, &100);
    fund(&env, &client, &reward_token, 101_000);
    let referrer = Address::generate(&env);
    let alice = staker(&env, &stake_token, 1_000);
    client.deposit(&alice, &stake_token, &500, &None);

    env.ledger().set_sequence_number(200);
    client.deposit(&alice, &stake_token, &500, &Some(referrer.clone()));
    assert_eq!(client.get_position(&stake_token, &alice).pending_referral, 0);

    env.ledger().set_sequence_number(300);
    let receipt = client.harvest(&alice, &stake_token);
    assert_eq!(receipt.paid, 20_000);
    assert_eq!(receipt.referral, 100);
    assert_eq!(balance(&env, &reward_token, &referrer), 100);
}

#[test]
fn test_remainder_may_reach_rate_under_referral_share() {
    let (env, client, owner, reward_token, _) = setup(100);
    client.set_referral_bps(&owner, &100);
    // 990 ticks at 101 plus 100 spare.
    fund(&env, &client, &reward_token, 100_090);

    let funding = client.get_funding();
    let settings = client.get_settings();
    assert_eq!(funding.end_tick, 1_090);
    assert_eq!(funding.unallocated_remainder, 100);
    assert!(funding.unallocated_remainder >= funding.reward_per_tick);
    assert!(funding.unallocated_remainder < settings.effective_rate);
}

#[test]
fn test_referral_bps_above_hundred_percent_rejected() {
    let (_env, client, owner, _, _) = setup(100);
    match client.try_set_referral_bps(&owner, &10_001) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}
