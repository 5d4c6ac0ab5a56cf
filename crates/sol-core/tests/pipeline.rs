//! Cross-module integration tests exercising the full pipeline:
//! build instructions -> compile -> serialize -> sign -> encode.
//!
//! These use only the public API so that regressions at module boundaries
//! surface here.

use sol_core::codec::{base58_decode, base58_encode, base64_decode, encode_u64_le};
use sol_core::*;

/// A System Program transfer signed by seed 0x42, pinned byte for byte.
const GOLDEN_TRANSFER_BASE64: &str = "Ae2UzSxatbS6YAmEiAFoCGWF5APwgZI05kbZg68pSfiBprw5UBx29utxU32eNwE8S0DrD6Y8ejmRGJdBWjcE1wABAAEDIVL40Zt5HSRFMkLhXy6rbLfP+ntqXtMAl5YOBpiB2xK7u7u7u7u7u7u7u7u7u7u7u7u7u7u7u7u7u7u7u7u7uwAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMwBAgIAAQwCAAAAQEIPAAAAAAA=";

const GOLDEN_TRANSFER_SIGNATURE: &str =
    "5kW319puNshLz8wEy4XrnsVL8NKrEAHVj86A8xZEMMzb2uNmjDNRavFKzYypVUKecfnbU8msCUncTve55XCZrPNX";

// ─── SOL transfer: build -> sign -> base64 ─────────────────────────

#[test]
fn sol_transfer_matches_golden_wire_bytes() {
    let payer = Keypair::from_seed(&[0x42; 32]);
    assert_eq!(
        payer.pubkey().to_string(),
        "3F5qRPtKg8GhGNnbd3qCj6nVJxWsGxq7pvH84okYLAqf"
    );

    let to = Pubkey::new_from_array([0xBB; 32]);
    let blockhash = Hash::new_from_array([0xCC; 32]);

    let mut tx = Transaction::new(payer.pubkey(), blockhash);
    tx.add(system_program::transfer(&payer.pubkey(), &to, 1_000_000).unwrap());

    let signed = tx.sign(&[&payer]).unwrap();
    assert_eq!(signed.to_base64().unwrap(), GOLDEN_TRANSFER_BASE64);
    assert_eq!(signed.signature().to_string(), GOLDEN_TRANSFER_SIGNATURE);
}

#[test]
fn golden_wire_bytes_parse_and_verify() {
    let wire = base64_decode(GOLDEN_TRANSFER_BASE64).unwrap();
    let parsed = SignedTransaction::deserialize(&wire).unwrap();

    assert!(parsed.verify());
    assert_eq!(parsed.message().account_keys.len(), 3);
    assert_eq!(parsed.message().instructions[0].data[4..], encode_u64_le(1_000_000));
}

// ─── Program call: PDA + discriminator + two signers ──────────────

#[test]
fn anchor_style_call_with_pda_and_two_signers() {
    let payer = Keypair::from_seed(&[0x01; 32]);
    let authority = Keypair::from_seed(&[0x02; 32]);
    let program_id = Pubkey::new_from_array([0x77; 32]);

    let vault = find_program_address(&[b"vault", authority.pubkey().as_ref()], &program_id)
        .unwrap();

    let ix = Instruction::with_discriminator(
        program_id,
        "global",
        "deposit",
        &encode_u64_le(5_000),
        vec![
            AccountMeta::new(vault.address, false, true),
            AccountMeta::new(authority.pubkey(), true, false),
            AccountMeta::new(system_program::ID, false, false),
        ],
    );

    let blockhash: Hash = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N".parse().unwrap();
    let tx = Transaction::with_instructions(payer.pubkey(), blockhash, vec![ix]);
    let message_bytes = tx.serialize_message().unwrap();

    let signed = tx.sign(&[&payer, &authority]).unwrap();
    let message = signed.message();

    assert_eq!(message.header.num_required_signatures, 2);
    assert_eq!(message.header.num_readonly_signed_accounts, 1);
    assert_eq!(message.signer_keys(), &[payer.pubkey(), authority.pubkey()]);
    assert_eq!(&message.instructions[0].data[..8], &global_discriminator("deposit"));

    for (key, sig) in message.signer_keys().iter().zip(signed.signatures()) {
        assert!(sig.verify(key, &message_bytes));
    }
}

#[test]
fn missing_second_signer_is_rejected() {
    let payer = Keypair::from_seed(&[0x01; 32]);
    let authority = Keypair::from_seed(&[0x02; 32]);

    let ix = Instruction::new(
        Pubkey::new_from_array([0x77; 32]),
        vec![AccountMeta::new(authority.pubkey(), true, true)],
        vec![],
    );
    let tx = Transaction::with_instructions(payer.pubkey(), Hash::default(), vec![ix]);

    assert_eq!(
        tx.sign(&[&payer]).unwrap_err(),
        SolError::MissingSigner(authority.pubkey())
    );
}

#[test]
fn failed_instruction_build_stops_transaction_assembly() {
    fn build(payer: &Pubkey, to: &Pubkey, lamports: u64) -> Result<Transaction, SolError> {
        let ix = system_program::transfer(payer, to, lamports)?;
        Ok(Transaction::with_instructions(*payer, Hash::default(), vec![ix]))
    }

    let payer = Pubkey::new_from_array([1; 32]);
    let to = Pubkey::new_from_array([2; 32]);
    assert!(build(&payer, &to, 1).is_ok());
    assert!(matches!(
        build(&payer, &to, 0),
        Err(SolError::InvalidInstruction(_))
    ));
}

// ─── SPL token transfer to a derived ATA ──────────────────────────

#[test]
fn spl_transfer_between_associated_accounts() {
    let owner = Keypair::from_seed(&[0x09; 32]);
    let recipient = Pubkey::new_from_array([0x0A; 32]);
    let mint: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();

    let source = spl_token::get_associated_token_address(&owner.pubkey(), &mint).unwrap();
    let destination = spl_token::get_associated_token_address(&recipient, &mint).unwrap();

    let ix = spl_token::transfer(&source, &destination, &owner.pubkey(), 1_000_000).unwrap();
    let tx = Transaction::with_instructions(owner.pubkey(), Hash::default(), vec![ix]);
    let signed = tx.sign(&[&owner]).unwrap();

    // owner, source, destination, token program.
    assert_eq!(
        signed.message().account_keys,
        vec![owner.pubkey(), source, destination, spl_token::TOKEN_PROGRAM_ID]
    );
    assert!(signed.verify());
}

// ─── Codec properties at the boundary ─────────────────────────────

#[test]
fn base58_roundtrip_through_public_api() {
    for bytes in [vec![], vec![0u8; 32], vec![0, 0, 5, 6], vec![0xff; 64]] {
        assert_eq!(base58_decode(&base58_encode(&bytes)).unwrap(), bytes);
    }
}

#[test]
fn discriminator_matches_reference_hash() {
    let hash = sha256(b"global:initialize");
    assert_eq!(calculate_discriminator("global", "initialize"), hash[..8]);
}

#[test]
fn golden_pda_for_zero_program() {
    let pda = find_program_address(&[b"seed"], &Pubkey::default()).unwrap();
    assert_eq!(
        pda.address.to_string(),
        "8ZiyjNgnFFPyw39NyMQE5FGETTjyUhSHUVQG3oKAFZiU"
    );
    assert_eq!(pda.bump, 253);
    assert_eq!(pda, find_program_address(&[b"seed"], &Pubkey::default()).unwrap());
}
