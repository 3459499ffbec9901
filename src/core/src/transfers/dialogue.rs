use crate::club::PlayerAgent;
use crate::transfers::NegotiationStage;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_quality(quality: f64) -> Self {
        if quality >= 1.0 {
            Sentiment::Positive
        } else if quality < 0.6 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// What the other side says back after an offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegotiationResponse {
    pub sentiment: Sentiment,
    pub message: String,
}

impl NegotiationResponse {
    const STUBBORN: u8 = 70;
    const GREEDY_FEE_PCT: f32 = 8.0;

    pub fn generate(agent: &PlayerAgent, stage: NegotiationStage, quality: f64) -> Self {
        let sentiment = Sentiment::from_quality(quality);
        let stubborn = agent.stubbornness >= Self::STUBBORN;

        let mut message = String::from(match (stage, sentiment) {
            (NegotiationStage::ClubFee, Sentiment::Positive) => "We accept the fee. You may talk to the player.",
            (NegotiationStage::ClubFee, Sentiment::Neutral) if stubborn => {
                "The board will not move. Come back with a serious figure."
            }
            (NegotiationStage::ClubFee, Sentiment::Neutral) => "We are getting closer, but the fee is still short.",
            (NegotiationStage::ClubFee, Sentiment::Negative) => "That offer is an insult to the club.",
            (_, Sentiment::Positive) => "My client is happy with these terms.",
            (_, Sentiment::Neutral) if stubborn => "My client knows what they are worth. These terms are not enough.",
            (_, Sentiment::Neutral) => "There is something to build on, but my client expects more.",
            (_, Sentiment::Negative) => "We are wasting each other's time.",
        });

        if stage != NegotiationStage::ClubFee
            && sentiment != Sentiment::Positive
            && agent.fee_pct >= Self::GREEDY_FEE_PCT
        {
            message.push_str(" And my own fee has to be taken care of.");
        }

        NegotiationResponse { sentiment, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_thresholds() {
        assert_eq!(Sentiment::from_quality(1.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_quality(0.99), Sentiment::Neutral);
        assert_eq!(Sentiment::from_quality(0.6), Sentiment::Neutral);
        assert_eq!(Sentiment::from_quality(0.59), Sentiment::Negative);
    }

    #[test]
    fn agent_temperament_changes_the_reply() {
        let calm = PlayerAgent { stubbornness: 20, fee_pct: 3.0 };
        let tough = PlayerAgent { stubbornness: 90, fee_pct: 10.0 };

        let calm_reply = NegotiationResponse::generate(&calm, NegotiationStage::Contract, 0.8);
        let tough_reply = NegotiationResponse::generate(&tough, NegotiationStage::Contract, 0.8);

        assert_eq!(calm_reply.sentiment, Sentiment::Neutral);
        assert_ne!(calm_reply.message, tough_reply.message);
        assert!(tough_reply.message.ends_with("taken care of."));
        assert!(!calm_reply.message.contains("my own fee"));
    }
}
